use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

// ---------------------------------------------------------------------------
// Field values
// ---------------------------------------------------------------------------

/// A scalar cell as returned by the model.
///
/// The prompt asks for strings or numbers, but the model is not bound by it,
/// so any other JSON shape is carried through untouched.
/// Variant order matters for `#[serde(untagged)]` decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(Number),
    Text(String),
    Other(Value),
}

impl FieldValue {
    /// Text form of the value, as it would be shown in a table cell.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Other(v) => v.to_string(),
        }
    }

    /// Blank means the text form is empty after trimming whitespace.
    /// Numbers (zero included) are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Number(_) => false,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Other(v) => v.to_string().trim().is_empty(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n.into())
    }
}

// ---------------------------------------------------------------------------
// Extraction record
// ---------------------------------------------------------------------------

/// One row of the invoice table.
///
/// Absent values serialize as `null` so every schema key is always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub serial_number: Option<FieldValue>,
    pub particulars: Option<FieldValue>,
    pub colour: Option<FieldValue>,
    pub size: Option<FieldValue>,
    pub quantity: Option<FieldValue>,
    pub unit_price: Option<FieldValue>,
    pub amount: Option<FieldValue>,

    /// Keys the model emitted beyond the schema.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The structured document extracted from an invoice or order image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub vendor_name: Option<FieldValue>,
    pub vendor_address: Option<FieldValue>,
    #[serde(rename = "vendorGSTIN")]
    pub vendor_gstin: Option<FieldValue>,
    pub invoice_number: Option<FieldValue>,
    pub invoice_date: Option<FieldValue>,
    pub buyer_name: Option<FieldValue>,
    pub buyer_address: Option<FieldValue>,
    #[serde(rename = "buyerGSTIN")]
    pub buyer_gstin: Option<FieldValue>,
    pub currency: Option<FieldValue>,
    pub total_amount: Option<FieldValue>,
    pub tax_amount: Option<FieldValue>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub line_items: Vec<LineItem>,
    pub terms: Option<FieldValue>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<LineItem>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<LineItem>>::deserialize(deserializer)?.unwrap_or_default())
}

/// What a request hands back to its caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractionOutcome {
    /// The model produced schema-shaped JSON.
    Structured(ExtractionResult),
    /// Valid JSON that does not fit the record schema, returned as parsed.
    Passthrough(Value),
    /// The model output could not be parsed; both texts are returned for inspection.
    Degraded {
        raw: String,
        #[serde(rename = "fullResponse")]
        full_response: String,
    },
}

impl ExtractionOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, ExtractionOutcome::Degraded { .. })
    }
}
