//! Nondeterministic picks made by a spec action.
//!
//! When quint runs with `--mbt`, each action records the nondeterministic
//! choices it made (`nondet x = oneOf(...)`) so the implementation can replay
//! that exact choice. Picks for optional parameters arrive wrapped in Quint's
//! `Option`; [`NondetPicks`] unwraps those on construction, so an absent pick
//! is simply missing rather than present-with-None.

use crate::error::{PickError, TraceError};
use crate::value::Value;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use std::fmt;

/// The nondeterministic picks of a single [`Step`](crate::Step), keyed by
/// pick name in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NondetPicks {
    picks: IndexMap<String, Value>,
}

impl NondetPicks {
    /// A pick set with no picks (e.g. for unit sum-type variants).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a pick set from the `mbt::nondetPicks` value, which must be a
    /// record.
    pub fn from_value(value: Value) -> Result<Self, TraceError> {
        match value {
            Value::Record(fields) => Ok(Self::from_record(fields)),
            other => Err(TraceError::NondetNotRecord {
                found: other.to_string(),
            }),
        }
    }

    /// Build a pick set from a record, unwrapping Quint `Option` values and
    /// dropping `None` entries.
    pub fn from_record(record: IndexMap<String, Value>) -> Self {
        let mut picks = IndexMap::new();
        for (name, value) in record {
            if let Some(unwrapped) = value.into_option() {
                picks.insert(name, unwrapped);
            }
        }
        Self { picks }
    }

    /// The raw pick value, or `None` if the action never made that pick.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.picks.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    /// Decode a required pick into a caller type via normalized JSON.
    ///
    /// A missing pick is an error; use [`NondetPicks::decode_opt`] for picks
    /// whose spec type is optional.
    pub fn decode<T: DeserializeOwned>(&self, name: &str) -> Result<T, PickError> {
        let value = self
            .get(name)
            .ok_or_else(|| PickError::Missing(name.to_string()))?;
        decode_value(name, value)
    }

    /// Decode an optional pick, returning `Ok(None)` when the pick is absent.
    pub fn decode_opt<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, PickError> {
        match self.get(name) {
            None => Ok(None),
            Some(value) => decode_value(name, value).map(Some),
        }
    }
}

fn decode_value<T: DeserializeOwned>(name: &str, value: &Value) -> Result<T, PickError> {
    let tree = value.normalized().map_err(|e| PickError::Decode {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    serde_json::from_value(tree).map_err(|e| PickError::Decode {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

impl fmt::Display for NondetPicks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in &self.picks {
            if !first {
                writeln!(f)?;
            }
            write!(f, "+ {name}: {value}")?;
            first = false;
        }
        Ok(())
    }
}
