//! Scalar and attribute values read from a container.

use std::fmt;

/// A single element of a dataset or attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    /// Signed integer of any width.
    Int(i64),
    /// Unsigned integer of any width.
    UInt(u64),
    /// Floating point value of any width.
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// Fixed-size byte string, not yet decoded.
    Bytes(Vec<u8>),
}

impl ScalarValue {
    /// Short element type name shown in the attribute table.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Bytes(_) => "string",
        }
    }

    /// Numeric view of the value, used for pixel decoding.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::UInt(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            Self::Bytes(_) => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::UInt(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(trim_nul(b))),
        }
    }
}

/// Value of a metadata attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// A single value (number, bool or byte string).
    Scalar(ScalarValue),
    /// A fixed-length homogeneous array.
    Array(Vec<ScalarValue>),
}

impl From<ScalarValue> for AttributeValue {
    fn from(value: ScalarValue) -> Self {
        Self::Scalar(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Scalar(ScalarValue::Bytes(value.as_bytes().to_vec()))
    }
}

/// Strip the NUL padding HDF fixed-size strings carry.
pub fn trim_nul(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map(|i| i + 1)
        .unwrap_or(0);
    &bytes[..end]
}
