//! Typed representation of values in the
//! [Informal Trace Format (ITF)](https://apalache-mc.org/docs/adr/015adr-trace.html).
//!
//! ITF is the JSON-based format Quint and Apalache use to encode execution
//! traces. JSON has fewer types than Quint/TLA+, so ITF wraps the missing
//! types in single-key objects with `#`-prefixed marker keys:
//!
//! | ITF JSON                      | [`Value`] variant |
//! |-------------------------------|-------------------|
//! | `true` / `false`              | `Bool`            |
//! | `42`                          | `Int`             |
//! | `"hello"`                     | `Str`             |
//! | `{"#bigint": "123"}`          | `BigInt`          |
//! | `[1, 2, 3]`                   | `List`            |
//! | `{"#tup": [1, 2]}`            | `Tuple`           |
//! | `{"#set": [1, 2]}`            | `Set`             |
//! | `{"#map": [[k, v], ...]}`     | `Map`             |
//! | `{"field": ...}`              | `Record`          |
//!
//! Use [`Value::from_json`] to decode raw ITF JSON and [`Value::normalized`]
//! to produce marker-free JSON that ordinary `#[derive(Deserialize)]` state
//! types can consume.

use crate::error::ValueError;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::json;
use std::fmt;

/// ITF metadata key, stripped wherever records and states are parsed.
pub const META_KEY: &str = "#meta";

pub(crate) const BIGINT_KEY: &str = "#bigint";
pub(crate) const TUP_KEY: &str = "#tup";
pub(crate) const SET_KEY: &str = "#set";
pub(crate) const MAP_KEY: &str = "#map";

/// A single value from an ITF trace.
///
/// Sum-type variants emitted by Quint have the record shape
/// `{"tag": "VariantName", "value": ...}`; [`Value::into_option`] unwraps
/// Quint's built-in `Option` from that representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A boolean value.
    Bool(bool),

    /// A 64-bit integer. Quint `int` values that fit in an `i64` are encoded
    /// as plain JSON numbers.
    Int(i64),

    /// A string value.
    Str(String),

    /// An arbitrary-precision integer, encoded as `{"#bigint": "123"}`.
    /// The payload is kept as a decimal string to avoid precision loss.
    BigInt(String),

    /// A Quint `List[T]`, encoded as a plain JSON array.
    List(Vec<Value>),

    /// A Quint tuple, encoded as `{"#tup": [...]}`. Element `._1` is at
    /// index 0, `._2` at index 1, and so on.
    Tuple(Vec<Value>),

    /// A Quint `Set[T]`, encoded as `{"#set": [...]}`. The element order in
    /// the wire form carries no meaning.
    Set(Vec<Value>),

    /// A Quint map (`T -> V`), encoded as `{"#map": [[k, v], ...]}`.
    Map(Vec<(Value, Value)>),

    /// A Quint record or sum-type variant, encoded as a plain JSON object.
    /// Field order is preserved from the source document.
    Record(IndexMap<String, Value>),

    /// A value the Quint CLI could not serialize, carried as a raw string.
    /// Encountering one where a typed value is expected is an error.
    Unserializable(String),
}

impl Value {
    /// Decode a raw ITF JSON tree into a [`Value`].
    ///
    /// An object is routed to a marker variant only when it has exactly one
    /// key and that key is the marker; every other object is a [`Value::Record`]
    /// (with `#meta` stripped), so a multi-field record may legitimately
    /// contain `#bigint` or `#tup` as field names.
    pub fn from_json(tree: &serde_json::Value) -> Result<Self, ValueError> {
        use serde_json::Value as Json;

        match tree {
            Json::Bool(b) => Ok(Value::Bool(*b)),
            Json::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .ok_or_else(|| ValueError::UnsupportedNumber {
                    found: n.to_string(),
                }),
            Json::String(s) => Ok(Value::Str(s.clone())),
            Json::Array(items) => Ok(Value::List(
                items.iter().map(Value::from_json).collect::<Result<_, _>>()?,
            )),
            Json::Object(obj) if obj.len() == 1 && obj.contains_key(BIGINT_KEY) => {
                match &obj[BIGINT_KEY] {
                    Json::String(s) => Ok(Value::BigInt(s.clone())),
                    other => Err(ValueError::MarkerPayload {
                        marker: BIGINT_KEY,
                        expected: "a decimal string",
                        found: other.to_string(),
                    }),
                }
            }
            Json::Object(obj) if obj.len() == 1 && obj.contains_key(TUP_KEY) => {
                marker_elements(&obj[TUP_KEY], TUP_KEY).map(Value::Tuple)
            }
            Json::Object(obj) if obj.len() == 1 && obj.contains_key(SET_KEY) => {
                marker_elements(&obj[SET_KEY], SET_KEY).map(Value::Set)
            }
            Json::Object(obj) if obj.len() == 1 && obj.contains_key(MAP_KEY) => {
                let Json::Array(pairs) = &obj[MAP_KEY] else {
                    return Err(ValueError::MarkerPayload {
                        marker: MAP_KEY,
                        expected: "an array of pairs",
                        found: obj[MAP_KEY].to_string(),
                    });
                };
                let entries = pairs
                    .iter()
                    .map(|pair| match pair.as_array().map(Vec::as_slice) {
                        Some([k, v]) => Ok((Value::from_json(k)?, Value::from_json(v)?)),
                        _ => Err(ValueError::MapEntry {
                            found: pair.to_string(),
                        }),
                    })
                    .collect::<Result<_, _>>()?;
                Ok(Value::Map(entries))
            }
            Json::Object(obj) => {
                let mut fields = IndexMap::new();
                for (k, v) in obj {
                    if k != META_KEY {
                        fields.insert(k.clone(), Value::from_json(v)?);
                    }
                }
                Ok(Value::Record(fields))
            }
            Json::Null => Err(ValueError::UnsupportedJson {
                found: "null".into(),
            }),
        }
    }

    /// Encode this value back into ITF JSON, the exact inverse of
    /// [`Value::from_json`].
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Bool(b) => json!(b),
            Value::Int(n) => json!(n),
            Value::Str(s) => json!(s),
            Value::BigInt(s) => json!({ BIGINT_KEY: s }),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Tuple(items) => {
                json!({ TUP_KEY: items.iter().map(Value::to_json).collect::<Vec<_>>() })
            }
            Value::Set(items) => {
                json!({ SET_KEY: items.iter().map(Value::to_json).collect::<Vec<_>>() })
            }
            Value::Map(entries) => json!({
                MAP_KEY: entries
                    .iter()
                    .map(|(k, v)| vec![k.to_json(), v.to_json()])
                    .collect::<Vec<_>>()
            }),
            Value::Record(fields) => serde_json::Value::Object(
                fields.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::Unserializable(s) => json!(s),
        }
    }

    /// Convert this value to plain JSON that standard `#[derive(Deserialize)]`
    /// types can consume.
    ///
    /// The `#`-marker encodings are flattened:
    ///
    /// - `Tuple` and `Set` become plain arrays (map sets to a `Vec<T>` in
    ///   your state type)
    /// - `BigInt` becomes an `i64`-backed number when it fits, otherwise an
    ///   arbitrary-precision number literal
    /// - `Map` becomes an object with string keys (so `HashMap<i64, V>` and
    ///   friends deserialize directly); non-scalar keys are an error
    pub fn normalized(&self) -> Result<serde_json::Value, ValueError> {
        match self {
            Value::Bool(b) => Ok(json!(b)),
            Value::Int(n) => Ok(json!(n)),
            Value::Str(s) => Ok(json!(s)),
            Value::BigInt(s) => match s.parse::<i64>() {
                Ok(n) => Ok(json!(n)),
                Err(_) => s
                    .parse::<serde_json::Number>()
                    .map(serde_json::Value::Number)
                    .map_err(|_| ValueError::InvalidBigInt { found: s.clone() }),
            },
            Value::List(items) | Value::Tuple(items) | Value::Set(items) => {
                Ok(serde_json::Value::Array(
                    items
                        .iter()
                        .map(Value::normalized)
                        .collect::<Result<_, _>>()?,
                ))
            }
            Value::Map(entries) => {
                let mut obj = serde_json::Map::new();
                for (k, v) in entries {
                    obj.insert(k.as_key()?, v.normalized()?);
                }
                Ok(serde_json::Value::Object(obj))
            }
            Value::Record(fields) => {
                let mut obj = serde_json::Map::new();
                for (k, v) in fields {
                    obj.insert(k.clone(), v.normalized()?);
                }
                Ok(serde_json::Value::Object(obj))
            }
            Value::Unserializable(s) => Ok(json!(s)),
        }
    }

    /// Unwrap a Quint `Option` value.
    ///
    /// - `{tag: "Some", value: v}` → `Some(v)`
    /// - `{tag: "None"}` → `None`
    /// - anything else → `Some(self)` unchanged (not an Option)
    pub fn into_option(self) -> Option<Value> {
        match self {
            Value::Record(mut fields) => match fields.get("tag") {
                Some(Value::Str(tag)) if tag == "Some" => fields.shift_remove("value"),
                Some(Value::Str(tag)) if tag == "None" => None,
                _ => Some(Value::Record(fields)),
            },
            other => Some(other),
        }
    }

    /// The string form of this value when used as a JSON object key.
    fn as_key(&self) -> Result<String, ValueError> {
        match self {
            Value::Int(n) => Ok(n.to_string()),
            Value::BigInt(s) => Ok(s.clone()),
            Value::Str(s) => Ok(s.clone()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(ValueError::UnsupportedKeyType { kind: other.kind() }),
        }
    }

    /// Short variant name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "string",
            Value::BigInt(_) => "bigint",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Record(_) => "record",
            Value::Unserializable(_) => "unserializable",
        }
    }
}

fn marker_elements(
    payload: &serde_json::Value,
    marker: &'static str,
) -> Result<Vec<Value>, ValueError> {
    match payload {
        serde_json::Value::Array(items) => {
            items.iter().map(Value::from_json).collect::<Result<_, _>>()
        }
        other => Err(ValueError::MarkerPayload {
            marker,
            expected: "an array",
            found: other.to_string(),
        }),
    }
}

impl fmt::Display for Value {
    /// Deterministic human-readable rendering for diagnostics. Not meant for
    /// comparison; state comparison goes through [`Value::normalized`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "\"{s}\""),
            Value::BigInt(s) => write!(f, "{s}"),
            Value::List(items) => write!(f, "List({})", join(items)),
            Value::Tuple(items) => write!(f, "({})", join(items)),
            Value::Set(items) => write!(f, "Set({})", join(items)),
            Value::Map(entries) => {
                let body = entries
                    .iter()
                    .map(|(k, v)| format!("{k} -> {v}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "Map({body})")
            }
            Value::Record(fields) => display_record(f, fields),
            Value::Unserializable(s) => write!(f, "{s}"),
        }
    }
}

fn join(items: &[Value]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Two-field `{tag, value}` records are sum-type variants and render as
/// `Tag`, `Tag(v)`, or `Tag(a, b)`; everything else renders as `{ k: v, ... }`.
fn display_record(
    f: &mut fmt::Formatter<'_>,
    fields: &IndexMap<String, Value>,
) -> fmt::Result {
    if fields.len() == 2 {
        if let (Some(Value::Str(tag)), Some(value)) = (fields.get("tag"), fields.get("value")) {
            return match value {
                Value::Tuple(items) if items.is_empty() => write!(f, "{tag}"),
                Value::Tuple(_) => write!(f, "{tag}{value}"),
                _ => write!(f, "{tag}({value})"),
            };
        }
    }
    let body = fields
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join(", ");
    write!(f, "{{ {body} }}")
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tree = serde_json::Value::deserialize(deserializer)?;
        Value::from_json(&tree).map_err(serde::de::Error::custom)
    }
}
