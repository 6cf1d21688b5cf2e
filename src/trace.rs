//! ITF trace document parser.
//!
//! A trace document is a JSON object with `vars` (informational list of
//! variable names) and `states` (ordered state records). See the
//! [ITF ADR](https://apalache-mc.org/docs/adr/015adr-trace.html) for the
//! full format.

use crate::error::TraceError;
use crate::value::{Value, META_KEY};
use indexmap::IndexMap;

/// One trace state: an ordered mapping from variable name to [`Value`],
/// with the `#meta` key already stripped.
pub type StateVars = IndexMap<String, Value>;

/// A parsed ITF trace: an ordered sequence of states produced by one
/// simulated execution of the specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    /// Variable names declared by the trace, in declaration order.
    pub vars: Vec<String>,

    /// The states of the execution, in generation order.
    pub states: Vec<StateVars>,
}

impl Trace {
    /// Parse a trace document from a JSON tree.
    pub fn from_json(root: &serde_json::Value) -> Result<Self, TraceError> {
        let obj = root.as_object().ok_or(TraceError::RootNotObject)?;

        let vars = match obj.get("vars") {
            None => Vec::new(),
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .map(|v| {
                    v.as_str().map(str::to_string).ok_or(TraceError::FieldShape {
                        field: "vars".into(),
                        expected: "an array of strings",
                    })
                })
                .collect::<Result<_, _>>()?,
            Some(_) => {
                return Err(TraceError::FieldShape {
                    field: "vars".into(),
                    expected: "an array of strings",
                })
            }
        };

        let states = match obj.get("states") {
            None => Vec::new(),
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, state)| parse_state(i, state))
                .collect::<Result<_, _>>()?,
            Some(_) => {
                return Err(TraceError::FieldShape {
                    field: "states".into(),
                    expected: "an array of objects",
                })
            }
        };

        Ok(Trace { vars, states })
    }

    /// Parse a trace document from raw JSON text.
    pub fn from_str(json: &str) -> Result<Self, TraceError> {
        let root: serde_json::Value =
            serde_json::from_str(json).map_err(|e| TraceError::Json(e.to_string()))?;
        Self::from_json(&root)
    }
}

fn parse_state(index: usize, state: &serde_json::Value) -> Result<StateVars, TraceError> {
    let obj = state.as_object().ok_or_else(|| TraceError::FieldShape {
        field: format!("states[{index}]"),
        expected: "an object",
    })?;

    let mut vars = IndexMap::new();
    for (name, value) in obj {
        if name != META_KEY {
            vars.insert(name.clone(), Value::from_json(value)?);
        }
    }
    Ok(vars)
}
