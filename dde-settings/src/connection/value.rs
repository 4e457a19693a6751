//! Key kinds and the tagged values stored in [`ConnectionData`].
//!
//! [`ConnectionData`]: crate::connection::ConnectionData

use std::fmt::{Display, Formatter};

/// Static type tag of a connection setting key.
///
/// The kind decides how a key's value is marshaled to and from JSON and
/// which zero value a lenient read falls back to. `Unknown` is returned for
/// any key outside a group's table and never matches a typed branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    String,
    Boolean,
    Uint64,
    Int64,
    Int32,
    Float64,
    ArrayOfString,
    Unknown,
}

impl KeyKind {
    /// The value a read falls back to when the key is absent or holds a
    /// value of another kind. `None` for `Unknown`.
    pub fn zero_value(self) -> Option<SettingValue> {
        match self {
            Self::String => Some(SettingValue::String(String::new())),
            Self::Boolean => Some(SettingValue::Boolean(false)),
            Self::Uint64 => Some(SettingValue::Uint64(0)),
            Self::Int64 => Some(SettingValue::Int64(0)),
            Self::Int32 => Some(SettingValue::Int32(0)),
            Self::Float64 => Some(SettingValue::Float64(0.0)),
            Self::ArrayOfString => Some(SettingValue::ArrayOfString(Vec::new())),
            Self::Unknown => None,
        }
    }

    /// Decodes JSON text into a value of this kind.
    ///
    /// `null` is accepted for `ArrayOfString` and yields an empty list.
    /// Returns `Ok(None)` for `Unknown`.
    pub fn decode_json(self, json: &str) -> serde_json::Result<Option<SettingValue>> {
        let value = match self {
            Self::String => SettingValue::String(serde_json::from_str(json)?),
            Self::Boolean => SettingValue::Boolean(serde_json::from_str(json)?),
            Self::Uint64 => SettingValue::Uint64(serde_json::from_str(json)?),
            Self::Int64 => SettingValue::Int64(serde_json::from_str(json)?),
            Self::Int32 => SettingValue::Int32(serde_json::from_str(json)?),
            Self::Float64 => SettingValue::Float64(serde_json::from_str(json)?),
            Self::ArrayOfString => {
                let items: Option<Vec<String>> = serde_json::from_str(json)?;
                SettingValue::ArrayOfString(items.unwrap_or_default())
            }
            Self::Unknown => return Ok(None),
        };
        Ok(Some(value))
    }
}

impl Display for KeyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Boolean => write!(f, "boolean"),
            Self::Uint64 => write!(f, "uint64"),
            Self::Int64 => write!(f, "int64"),
            Self::Int32 => write!(f, "int32"),
            Self::Float64 => write!(f, "float64"),
            Self::ArrayOfString => write!(f, "array of string"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A connection setting value, one variant per [`KeyKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    String(String),
    Boolean(bool),
    Uint64(u64),
    Int64(i64),
    Int32(i32),
    Float64(f64),
    ArrayOfString(Vec<String>),
}

impl SettingValue {
    /// The kind this value belongs to.
    pub fn kind(&self) -> KeyKind {
        match self {
            Self::String(_) => KeyKind::String,
            Self::Boolean(_) => KeyKind::Boolean,
            Self::Uint64(_) => KeyKind::Uint64,
            Self::Int64(_) => KeyKind::Int64,
            Self::Int32(_) => KeyKind::Int32,
            Self::Float64(_) => KeyKind::Float64,
            Self::ArrayOfString(_) => KeyKind::ArrayOfString,
        }
    }

    /// Encodes the value as standalone JSON text.
    ///
    /// An empty string list encodes as `null`, matching an unset optional
    /// array. Non-finite floats encode as `null` as well.
    pub fn to_json(&self) -> String {
        let json = match self {
            Self::String(s) => serde_json::Value::from(s.as_str()),
            Self::Boolean(b) => serde_json::Value::from(*b),
            Self::Uint64(n) => serde_json::Value::from(*n),
            Self::Int64(n) => serde_json::Value::from(*n),
            Self::Int32(n) => serde_json::Value::from(*n),
            Self::Float64(n) => serde_json::Value::from(*n),
            Self::ArrayOfString(items) if items.is_empty() => serde_json::Value::Null,
            Self::ArrayOfString(items) => serde_json::Value::from(items.clone()),
        };
        json.to_string()
    }
}

/// Rust types that can back a typed connection key.
pub trait SettingType: Default + Sized {
    /// Kind of every key declared with this type.
    const KIND: KeyKind;

    /// Narrows a stored value to this type, `None` on a kind mismatch.
    fn from_value(value: &SettingValue) -> Option<Self>;

    /// Wraps the value in its [`SettingValue`] variant.
    fn into_value(self) -> SettingValue;
}

macro_rules! impl_setting_type {
    ($ty:ty, $variant:ident) => {
        impl SettingType for $ty {
            const KIND: KeyKind = KeyKind::$variant;

            fn from_value(value: &SettingValue) -> Option<Self> {
                match value {
                    SettingValue::$variant(v) => Some(v.to_owned()),
                    _ => None,
                }
            }

            fn into_value(self) -> SettingValue {
                SettingValue::$variant(self)
            }
        }

        impl From<$ty> for SettingValue {
            fn from(value: $ty) -> Self {
                value.into_value()
            }
        }
    };
}

impl_setting_type!(String, String);
impl_setting_type!(bool, Boolean);
impl_setting_type!(u64, Uint64);
impl_setting_type!(i64, Int64);
impl_setting_type!(i32, Int32);
impl_setting_type!(f64, Float64);
impl_setting_type!(Vec<String>, ArrayOfString);

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values_match_their_kind() {
        for kind in [
            KeyKind::String,
            KeyKind::Boolean,
            KeyKind::Uint64,
            KeyKind::Int64,
            KeyKind::Int32,
            KeyKind::Float64,
            KeyKind::ArrayOfString,
        ] {
            let zero = kind.zero_value().expect("typed kinds have a zero value");
            assert_eq!(zero.kind(), kind);
        }
        assert_eq!(KeyKind::Unknown.zero_value(), None);
    }

    #[test]
    fn empty_string_list_encodes_as_null() {
        assert_eq!(SettingValue::ArrayOfString(vec![]).to_json(), "null");
        assert_eq!(
            SettingValue::ArrayOfString(vec!["user:alice:".into()]).to_json(),
            r#"["user:alice:"]"#
        );
    }

    #[test]
    fn scalars_encode_as_plain_json() {
        assert_eq!(SettingValue::from("eth0").to_json(), r#""eth0""#);
        assert_eq!(SettingValue::Boolean(true).to_json(), "true");
        assert_eq!(SettingValue::Uint64(1_700_000_000).to_json(), "1700000000");
        assert_eq!(SettingValue::Int64(-1).to_json(), "-1");
        assert_eq!(SettingValue::Int32(100).to_json(), "100");
        assert_eq!(SettingValue::Float64(1.5).to_json(), "1.5");
        assert_eq!(SettingValue::Float64(f64::NAN).to_json(), "null");
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(SettingValue::from("a \"b\"").to_json(), r#""a \"b\"""#);
    }

    #[test]
    fn decode_null_array() {
        assert_eq!(
            KeyKind::ArrayOfString.decode_json("null").unwrap(),
            Some(SettingValue::ArrayOfString(vec![]))
        );
    }

    #[test]
    fn decode_rejects_wrong_kind() {
        assert!(KeyKind::Uint64.decode_json("not-a-number").is_err());
        assert!(KeyKind::Uint64.decode_json("-1").is_err());
        assert!(KeyKind::Int32.decode_json("4294967296").is_err());
        assert!(KeyKind::Boolean.decode_json("\"true\"").is_err());
        assert!(KeyKind::String.decode_json("42").is_err());
    }

    #[test]
    fn decode_unknown_kind_is_none() {
        assert_eq!(KeyKind::Unknown.decode_json("\"x\"").unwrap(), None);
    }

    #[test]
    fn narrowing_is_strict() {
        assert_eq!(bool::from_value(&SettingValue::Boolean(true)), Some(true));
        assert_eq!(u64::from_value(&SettingValue::Int64(5)), None);
        assert_eq!(String::from_value(&SettingValue::Boolean(true)), None);
    }
}
