/// Instruction sent with every image. The schema it describes is the shape
/// [`ocrelay_core::ExtractionResult`] deserializes.
pub const EXTRACTION_PROMPT: &str = r#"
You are an OCR and data extraction engine.
You will receive an image of an invoice, sales order, or purchase order.
Your task:
1. Read all visible text from the image.
2. Identify invoice/order metadata and line items.
3. Output ONLY valid JSON according to the exact schema below.

SCHEMA:
{
  "vendorName": string|null,
  "vendorAddress": string|null,
  "vendorGSTIN": string|null,
  "invoiceNumber": string|null,
  "invoiceDate": string|null,        // Use ISO 8601 format (YYYY-MM-DD) if possible
  "buyerName": string|null,
  "buyerAddress": string|null,
  "buyerGSTIN": string|null,
  "currency": string|null,           // Example: "INR", "USD"
  "totalAmount": number|null,
  "taxAmount": number|null,
  "lineItems": [
    {
      "serialNumber": number|null,
      "particulars": string|null,
      "colour": string|null,
      "size": string|null,
      "quantity": number|null,
      "unitPrice": number|null,
      "amount": number|null
    }
  ],
  "terms": string|null
}

INSTRUCTIONS:
- Always include all keys exactly as in the schema, even if values are null.
- Preserve numeric values as numbers (no quotes).
- If a field is not visible, set it to null — do NOT omit it.
- For lineItems, read table columns carefully: description, colour, size, quantity, unit price, and amount.
- If the table is split across two halves or multiple columns, merge them by serial number order.
- Do not add extra text, markdown, or explanations.
- Return ONLY pure JSON.
"#;
