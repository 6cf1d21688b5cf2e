//! Step extraction from raw trace states.
//!
//! Quint records which action fired in one of two ways, selected by
//! [`DriverConfig::nondet_path`](crate::DriverConfig):
//!
//! - **MBT variables** (empty `nondet_path`): `quint run --mbt` adds the
//!   reserved `mbt::actionTaken` and `mbt::nondetPicks` variables to every
//!   state.
//! - **Sum-type action variable** (non-empty `nondet_path`): the spec itself
//!   keeps the fired action in a state variable holding a sum-type record
//!   `{tag: "ActionName", value: <picks>}`; `nondet_path` points at it.

use crate::driver::DriverConfig;
use crate::error::TraceError;
use crate::nondet::NondetPicks;
use crate::trace::StateVars;
use crate::value::Value;
use indexmap::IndexMap;
use std::fmt;

/// Reserved variable holding the fired action's name (`--mbt` convention).
pub const ACTION_TAKEN_VAR: &str = "mbt::actionTaken";

/// Reserved variable holding the action's nondet picks (`--mbt` convention).
pub const NONDET_PICKS_VAR: &str = "mbt::nondetPicks";

/// A single replayable step derived from one trace state: the action that
/// fired, the nondeterministic choices it made, and the residual state slice
/// to compare after executing it.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Step {
    /// Name of the spec action that produced this state. An empty name is a
    /// specification defect and is rejected by the replay engine.
    pub action_taken: String,

    /// Nondeterministic picks made by the action, options already unwrapped.
    pub nondet_picks: NondetPicks,

    /// Sub-tree of the post-action state designated for invariant checking
    /// (the state indexed by `DriverConfig::state_path`).
    pub state: Value,
}

impl Step {
    /// Derive a step from one raw trace state.
    ///
    /// Consumes the state map: the reserved MBT variables are removed before
    /// `state_path` indexing, so they never leak into the residual state.
    pub fn from_state(state: StateVars, config: &DriverConfig) -> Result<Self, TraceError> {
        if config.nondet_path.is_empty() {
            extract_from_mbt_vars(state, &config.state_path)
        } else {
            extract_from_sum_type(state, &config.nondet_path, &config.state_path)
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = if self.action_taken.is_empty() {
            "<anonymous>"
        } else {
            &self.action_taken
        };
        writeln!(f, "Action taken: {action}")?;
        if self.nondet_picks.is_empty() {
            writeln!(f, "Nondet picks: <none>")?;
        } else {
            writeln!(f, "Nondet picks:\n{}", self.nondet_picks)?;
        }
        match &self.state {
            Value::Record(fields) if fields.is_empty() => write!(f, "Next state: <none>"),
            Value::Record(fields) => {
                write!(f, "Next state:")?;
                for (k, v) in fields {
                    write!(f, "\n+ {k}: {v}")?;
                }
                Ok(())
            }
            Value::Map(entries) if entries.is_empty() => write!(f, "Next state: <none>"),
            Value::Map(entries) => {
                write!(f, "Next state:")?;
                for (k, v) in entries {
                    write!(f, "\n+ {k}: {v}")?;
                }
                Ok(())
            }
            other => write!(f, "Next state: {other}"),
        }
    }
}

/// Convention A: the action name and picks live in the reserved MBT
/// variables, which must both be present.
fn extract_from_mbt_vars(mut state: StateVars, state_path: &[String]) -> Result<Step, TraceError> {
    let action_taken = match state.shift_remove(ACTION_TAKEN_VAR) {
        Some(Value::Str(name)) => name,
        Some(other) => {
            return Err(TraceError::VariableShape {
                name: ACTION_TAKEN_VAR,
                expected: "a string",
                found: other.to_string(),
            })
        }
        None => return Err(TraceError::MissingVariable(ACTION_TAKEN_VAR)),
    };

    let nondet_picks = state
        .shift_remove(NONDET_PICKS_VAR)
        .ok_or(TraceError::MissingVariable(NONDET_PICKS_VAR))
        .and_then(NondetPicks::from_value)?;

    let state = value_at_path(state, state_path)?;
    Ok(Step {
        action_taken,
        nondet_picks,
        state,
    })
}

/// Convention B: descend `nondet_path` to a sum-type record whose tag names
/// the action and whose value holds the picks. The MBT variables are removed
/// from the top level if present, but their absence is fine here.
fn extract_from_sum_type(
    mut state: StateVars,
    nondet_path: &[String],
    state_path: &[String],
) -> Result<Step, TraceError> {
    let sum_record = record_at_path(&state, nondet_path)?;

    let action_taken = match sum_record.get("tag") {
        Some(Value::Str(name)) => name.clone(),
        _ => {
            return Err(TraceError::ActionNotSumType {
                found: Value::Record(sum_record.clone()).to_string(),
            })
        }
    };

    let nondet_picks = match sum_record.get("value") {
        Some(Value::Tuple(items)) if items.is_empty() => NondetPicks::empty(),
        Some(Value::Tuple(items)) => {
            return Err(TraceError::NonUnitTuple {
                found: Value::Tuple(items.clone()).to_string(),
            })
        }
        Some(Value::Record(fields)) => NondetPicks::from_record(fields.clone()),
        _ => {
            return Err(TraceError::NondetShape {
                found: Value::Record(sum_record.clone()).to_string(),
            })
        }
    };

    state.shift_remove(ACTION_TAKEN_VAR);
    state.shift_remove(NONDET_PICKS_VAR);

    let state = value_at_path(state, state_path)?;
    Ok(Step {
        action_taken,
        nondet_picks,
        state,
    })
}

/// Descend `path` through the state one record field per segment. The final
/// segment may resolve to any value kind; that value is the residual state.
fn value_at_path(state: StateVars, path: &[String]) -> Result<Value, TraceError> {
    let mut current = Value::Record(state);
    for segment in path {
        let mut fields = match current {
            Value::Record(fields) => fields,
            other => {
                return Err(TraceError::PathNotRecord {
                    segment: segment.clone(),
                    path: path.join("."),
                    found: other.to_string(),
                })
            }
        };
        match fields.shift_remove(segment) {
            Some(next) => current = next,
            None => {
                return Err(TraceError::PathMissing {
                    segment: segment.clone(),
                    path: path.join("."),
                    found: Value::Record(fields).to_string(),
                })
            }
        }
    }
    Ok(current)
}

/// Descend `path` requiring a record at every step, including the last.
fn record_at_path<'a>(
    state: &'a StateVars,
    path: &[String],
) -> Result<&'a IndexMap<String, Value>, TraceError> {
    let mut current = state;
    for segment in path {
        current = match current.get(segment) {
            Some(Value::Record(fields)) => fields,
            _ => {
                return Err(TraceError::RecordNotAtPath {
                    segment: segment.clone(),
                    path: path.join("."),
                    found: Value::Record(current.clone()).to_string(),
                })
            }
        };
    }
    Ok(current)
}
