//! Line-item forward-fill.
//!
//! Invoice tables often print a value once and leave the cells below it empty
//! ("same as above"). Forward-fill carries the last non-blank value of each
//! tracked column down into the blank cells that follow it.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::types::{FieldValue, LineItem};

/// A column of [`LineItem`] that can be forward-filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineItemField {
    SerialNumber,
    Particulars,
    Colour,
    Size,
    Quantity,
    UnitPrice,
    Amount,
}

/// Columns filled when nothing else is configured.
pub const DEFAULT_FILL_FIELDS: &[LineItemField] = &[
    LineItemField::Particulars,
    LineItemField::Colour,
    LineItemField::Size,
    LineItemField::Quantity,
    LineItemField::UnitPrice,
    LineItemField::Amount,
];

impl LineItemField {
    pub const ALL: &'static [LineItemField] = &[
        LineItemField::SerialNumber,
        LineItemField::Particulars,
        LineItemField::Colour,
        LineItemField::Size,
        LineItemField::Quantity,
        LineItemField::UnitPrice,
        LineItemField::Amount,
    ];

    /// JSON key of the column.
    pub fn name(self) -> &'static str {
        match self {
            LineItemField::SerialNumber => "serialNumber",
            LineItemField::Particulars => "particulars",
            LineItemField::Colour => "colour",
            LineItemField::Size => "size",
            LineItemField::Quantity => "quantity",
            LineItemField::UnitPrice => "unitPrice",
            LineItemField::Amount => "amount",
        }
    }

    pub fn get(self, item: &LineItem) -> Option<&FieldValue> {
        match self {
            LineItemField::SerialNumber => item.serial_number.as_ref(),
            LineItemField::Particulars => item.particulars.as_ref(),
            LineItemField::Colour => item.colour.as_ref(),
            LineItemField::Size => item.size.as_ref(),
            LineItemField::Quantity => item.quantity.as_ref(),
            LineItemField::UnitPrice => item.unit_price.as_ref(),
            LineItemField::Amount => item.amount.as_ref(),
        }
    }

    fn slot(self, item: &mut LineItem) -> &mut Option<FieldValue> {
        match self {
            LineItemField::SerialNumber => &mut item.serial_number,
            LineItemField::Particulars => &mut item.particulars,
            LineItemField::Colour => &mut item.colour,
            LineItemField::Size => &mut item.size,
            LineItemField::Quantity => &mut item.quantity,
            LineItemField::UnitPrice => &mut item.unit_price,
            LineItemField::Amount => &mut item.amount,
        }
    }
}

impl fmt::Display for LineItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown line item field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for LineItemField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LineItemField::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Fill blank cells of `fields` from the nearest preceding non-blank cell of
/// the same column.
///
/// Items are visited in the given order and each column keeps its own
/// last-seen value. Leading blanks stay blank.
pub fn forward_fill(items: &mut [LineItem], fields: &[LineItemField]) {
    let mut last_seen: Vec<Option<FieldValue>> = vec![None; fields.len()];

    for item in items.iter_mut() {
        for (field, last) in fields.iter().zip(last_seen.iter_mut()) {
            let cell = field.slot(item);
            if cell.as_ref().is_some_and(|value| !value.is_blank()) {
                *last = cell.clone();
            } else if let Some(previous) = last {
                *cell = Some(previous.clone());
            }
        }
    }
}

/// [`forward_fill`] over raw JSON rows, for output that does not fit the
/// record schema.
///
/// Non-object rows are skipped and do not reset any column. A cell is blank
/// when it is missing, `null`, or a whitespace-only string.
pub fn forward_fill_json(rows: &mut [Value], fields: &[LineItemField]) {
    let mut last_seen: Vec<Option<Value>> = vec![None; fields.len()];

    for row in rows.iter_mut().filter_map(Value::as_object_mut) {
        for (field, last) in fields.iter().zip(last_seen.iter_mut()) {
            let present = row.get(field.name()).filter(|v| !is_blank_json(v)).cloned();
            if present.is_some() {
                *last = present;
            } else if let Some(previous) = last {
                row.insert(field.name().to_string(), previous.clone());
            }
        }
    }
}

fn is_blank_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
