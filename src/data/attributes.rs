//! Attribute projection: raw attribute values to display-ready rows.

use super::storage::Container;
use super::value::trim_nul;
use super::{AttributeValue, ScalarValue};
use crate::error::{Result, ViewerError};
use crate::navigation::ResolvedObject;

/// Shape of an attribute value as shown in the attribute table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Single number or bool.
    Scalar,
    /// Fixed-length array.
    Array,
    /// Single decoded byte string.
    ByteString,
}

impl ValueKind {
    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Scalar => "Scalar",
            ValueKind::Array => "Array",
            ValueKind::ByteString => "String",
        }
    }
}

/// One row of the attribute table.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeEntry {
    /// Attribute name.
    pub name: String,
    /// Value shape.
    pub kind: ValueKind,
    /// Element type name (`int`, `float`, `string`, ...).
    pub type_name: String,
    /// 1 for scalars and byte strings, the element count for arrays.
    pub length: usize,
    /// Text shown in the value column.
    pub display_text: String,
}

impl AttributeEntry {
    /// Text for the "Type" column.
    pub fn type_label(&self) -> String {
        format!("{} ({})", self.kind.name(), self.type_name)
    }
}

/// Decode a byte string as UTF-8 after trimming NUL padding.
pub fn decode_bytes(name: &str, bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(trim_nul(bytes))
        .map(str::to_string)
        .map_err(|_| ViewerError::Decode {
            name: name.to_string(),
            len: bytes.len(),
        })
}

/// Read and project the attributes of a resolved object.
pub fn project<C: Container>(container: &C, object: &ResolvedObject) -> Result<Vec<AttributeEntry>> {
    let raw = container.attributes(&object.path)?;
    Ok(project_values(raw))
}

/// Project raw attribute values, keeping their order.
pub fn project_values(raw: Vec<(String, AttributeValue)>) -> Vec<AttributeEntry> {
    raw.into_iter()
        .map(|(name, value)| project_one(name, &value))
        .collect()
}

fn project_one(name: String, value: &AttributeValue) -> AttributeEntry {
    match value {
        AttributeValue::Array(items) => {
            let display_text = items
                .iter()
                .map(|item| element_text(&name, item))
                .collect::<Vec<_>>()
                .join(", ");
            let type_name = items
                .first()
                .map(ScalarValue::type_name)
                .unwrap_or("empty")
                .to_string();
            AttributeEntry {
                name,
                kind: ValueKind::Array,
                type_name,
                length: items.len(),
                display_text,
            }
        },
        AttributeValue::Scalar(ScalarValue::Bytes(bytes)) => AttributeEntry {
            display_text: decode_or_placeholder(&name, bytes),
            name,
            kind: ValueKind::ByteString,
            type_name: "string".to_string(),
            length: 1,
        },
        AttributeValue::Scalar(scalar) => AttributeEntry {
            name,
            kind: ValueKind::Scalar,
            type_name: scalar.type_name().to_string(),
            length: 1,
            display_text: scalar.to_string(),
        },
    }
}

fn element_text(name: &str, item: &ScalarValue) -> String {
    match item {
        ScalarValue::Bytes(bytes) => decode_or_placeholder(name, bytes),
        other => other.to_string(),
    }
}

fn decode_or_placeholder(name: &str, bytes: &[u8]) -> String {
    match decode_bytes(name, bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("{}", e);
            format!("<undecodable: {} bytes>", bytes.len())
        },
    }
}
