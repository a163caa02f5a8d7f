use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::types::RowValues;

/// Typed extraction from a stored [`RowValues`].
pub trait FromRowValue: Sized {
    /// `None` when the value has a different shape or does not fit.
    fn from_row_value(value: &RowValues) -> Option<Self>;
}

impl FromRowValue for RowValues {
    fn from_row_value(value: &RowValues) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromRowValue for i64 {
    fn from_row_value(value: &RowValues) -> Option<Self> {
        value.as_int().copied()
    }
}

impl FromRowValue for i32 {
    fn from_row_value(value: &RowValues) -> Option<Self> {
        value.as_int().and_then(|i| i32::try_from(*i).ok())
    }
}

impl FromRowValue for u64 {
    fn from_row_value(value: &RowValues) -> Option<Self> {
        value.as_int().and_then(|i| u64::try_from(*i).ok())
    }
}

impl FromRowValue for f64 {
    #[allow(clippy::cast_precision_loss)]
    fn from_row_value(value: &RowValues) -> Option<Self> {
        match value {
            RowValues::Float(f) => Some(*f),
            RowValues::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl FromRowValue for bool {
    fn from_row_value(value: &RowValues) -> Option<Self> {
        value.as_bool().copied()
    }
}

impl FromRowValue for String {
    fn from_row_value(value: &RowValues) -> Option<Self> {
        value.as_text().map(str::to_owned)
    }
}

impl FromRowValue for NaiveDateTime {
    fn from_row_value(value: &RowValues) -> Option<Self> {
        value.as_timestamp()
    }
}

impl FromRowValue for Vec<u8> {
    fn from_row_value(value: &RowValues) -> Option<Self> {
        value.as_blob().map(<[u8]>::to_vec)
    }
}

impl FromRowValue for JsonValue {
    fn from_row_value(value: &RowValues) -> Option<Self> {
        match value {
            RowValues::JSON(json) => Some(json.clone()),
            RowValues::Text(text) => serde_json::from_str(text).ok(),
            _ => None,
        }
    }
}
