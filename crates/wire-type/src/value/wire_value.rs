//! [`WireValue`] — the primitive tree produced by parsing the interchange format.

use std::fmt;

/// A primitive tree value as received from (or sent to) the wire.
///
/// Objects keep the key order of the source document.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    Null,
    Bool(bool),
    /// Integer that fits in i64
    Integer(i64),
    /// Floating-point number
    Float(f64),
    /// Canonical text
    Str(String),
    /// Undecoded byte string (non-canonical text representation)
    Bytes(Vec<u8>),
    Array(Vec<WireValue>),
    /// Object (ordered key-value pairs)
    Object(Vec<(String, WireValue)>),
}

impl WireValue {
    /// Parse a JSON document into a wire value.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Ok(value.into())
    }

    /// Short name of the value's shape, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Look up an object member by key. Returns `None` for non-objects.
    pub fn get(&self, key: &str) -> Option<&WireValue> {
        match self {
            Self::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn to_json_string(&self) -> String {
        serde_json::Value::from(self.clone()).to_string()
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json_string())
    }
}

impl From<serde_json::Value> for WireValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => WireValue::Null,
            serde_json::Value::Bool(b) => WireValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    WireValue::Integer(i)
                } else {
                    // u64 beyond i64::MAX degrades to float like any other wide number
                    WireValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => WireValue::Str(s),
            serde_json::Value::Array(arr) => {
                WireValue::Array(arr.into_iter().map(WireValue::from).collect())
            }
            serde_json::Value::Object(obj) => WireValue::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, WireValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<WireValue> for serde_json::Value {
    fn from(v: WireValue) -> Self {
        match v {
            WireValue::Null => serde_json::Value::Null,
            WireValue::Bool(b) => serde_json::Value::Bool(b),
            WireValue::Integer(i) => serde_json::json!(i),
            WireValue::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            WireValue::Str(s) => serde_json::Value::String(s),
            WireValue::Bytes(b) => serde_json::Value::String(String::from_utf8_lossy(&b).into_owned()),
            WireValue::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(serde_json::Value::from).collect())
            }
            WireValue::Object(obj) => serde_json::Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for WireValue {
    fn from(s: &str) -> Self {
        WireValue::Str(s.to_string())
    }
}

impl From<bool> for WireValue {
    fn from(b: bool) -> Self {
        WireValue::Bool(b)
    }
}

impl From<i64> for WireValue {
    fn from(i: i64) -> Self {
        WireValue::Integer(i)
    }
}

impl From<f64> for WireValue {
    fn from(f: f64) -> Self {
        WireValue::Float(f)
    }
}
