//! Firestore typed values ↔ plain JSON.
//!
//! Firestore's REST API wraps every value in a single-key object naming
//! its type (`{"stringValue": "x"}`, `{"integerValue": "42"}`, ...).
//! Products travel through the gateway as plain JSON, so documents are
//! converted on the way in and out.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FirestoreValue {
    NullValue(()),
    BooleanValue(bool),
    /// int64, transported as a decimal string
    IntegerValue(String),
    #[serde(with = "proto_double")]
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
    /// base64
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(LatLng),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<FirestoreValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FirestoreValue>,
}

pub type FirestoreFields = BTreeMap<String, FirestoreValue>;

impl From<&Value> for FirestoreValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::NullValue(()),
            Value::Bool(b) => Self::BooleanValue(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::IntegerValue(i.to_string()),
                // u64 above i64::MAX and all fractional numbers
                None => Self::DoubleValue(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => Self::StringValue(s.clone()),
            Value::Array(items) => Self::ArrayValue(ArrayValue {
                values: items.iter().map(Self::from).collect(),
            }),
            Value::Object(map) => Self::MapValue(MapValue {
                fields: encode_fields(map),
            }),
        }
    }
}

impl FirestoreValue {
    pub fn into_json(self) -> Value {
        match self {
            Self::NullValue(()) => Value::Null,
            Self::BooleanValue(b) => Value::Bool(b),
            Self::IntegerValue(s) => match s.parse::<i64>() {
                Ok(i) => Value::from(i),
                Err(_) => Value::String(s),
            },
            Self::DoubleValue(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
            Self::TimestampValue(s)
            | Self::StringValue(s)
            | Self::BytesValue(s)
            | Self::ReferenceValue(s) => Value::String(s),
            Self::GeoPointValue(p) => {
                let mut point = Map::new();
                point.insert("latitude".to_string(), Value::from(p.latitude));
                point.insert("longitude".to_string(), Value::from(p.longitude));
                Value::Object(point)
            }
            Self::ArrayValue(a) => {
                Value::Array(a.values.into_iter().map(Self::into_json).collect())
            }
            Self::MapValue(m) => Value::Object(decode_fields(m.fields)),
        }
    }
}

/// proto3 JSON carries non-finite doubles as `"NaN"`, `"Infinity"` and
/// `"-Infinity"`.
mod proto_double {
    use serde::de::{self, Deserializer, Unexpected, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_infinite() {
            serializer.serialize_str(if *value > 0.0 { "Infinity" } else { "-Infinity" })
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(DoubleVisitor)
    }

    struct DoubleVisitor;

    impl<'de> Visitor<'de> for DoubleVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number or one of \"NaN\", \"Infinity\", \"-Infinity\"")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            match v {
                "NaN" => Ok(f64::NAN),
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                other => Err(E::invalid_value(Unexpected::Str(other), &self)),
            }
        }
    }
}

pub fn encode_fields(fields: &Map<String, Value>) -> FirestoreFields {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), FirestoreValue::from(v)))
        .collect()
}

pub fn decode_fields(fields: FirestoreFields) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(k, v)| (k, v.into_json()))
        .collect()
}

/// Quote a top-level field name for use in an update mask.
///
/// Simple names (`[A-Za-z_][A-Za-z0-9_]*`) pass through; anything else is
/// wrapped in backticks with `` ` `` and `\` escaped.
pub fn field_path(name: &str) -> String {
    let mut chars = name.chars();
    let simple = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        return name.to_string();
    }

    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('`');
    for c in name.chars() {
        if c == '`' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('`');
    quoted
}
