//! Tagged cache values
//!
//! Redis hands back opaque bytes while in-process writers may store values that are
//! already structured. [`CachedValue`] keeps the two apart so decoding never depends on
//! runtime type inspection.

use crate::errors::DecodeMismatch;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::borrow::Cow;

/// A value read back from a cache store
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    /// Opaque text exactly as stored
    Raw(Vec<u8>),
    /// An already-structured value
    Structured(Value),
}

impl CachedValue {
    pub fn raw(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Raw(bytes.into())
    }

    /// Decode into `T`, parsing raw text as JSON first
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, DecodeMismatch> {
        match self {
            Self::Raw(bytes) => Ok(serde_json::from_slice(bytes)?),
            Self::Structured(value) => Ok(T::deserialize(value)?),
        }
    }

    /// Lossy text view of the value
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Raw(bytes) => String::from_utf8_lossy(bytes),
            Self::Structured(value) => Cow::Owned(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_json_decodes() {
        let value = CachedValue::raw(r#"[1,2,3]"#);
        let decoded: Vec<u32> = value.decode().unwrap();
        assert_eq!(decoded, vec![1, 2, 3]);
    }

    #[test]
    fn test_structured_decodes_without_parsing() {
        let value = CachedValue::Structured(json!({"a": 1}));
        let decoded: serde_json::Map<String, Value> = value.decode().unwrap();
        assert_eq!(decoded["a"], json!(1));
    }

    #[test]
    fn test_malformed_raw_is_a_mismatch() {
        let value = CachedValue::raw("not json {");
        assert!(value.decode::<Value>().is_err());
    }

    #[test]
    fn test_wrong_shape_is_a_mismatch() {
        let value = CachedValue::Structured(json!({"a": 1}));
        assert!(value.decode::<Vec<u32>>().is_err());
    }
}
