//! Core abstractions for connecting Rust implementations to Quint specs.
//!
//! A [`Driver`] adapts one system-under-test: it maps spec actions to Rust
//! calls via [`Driver::step`] (usually with the [`switch!`] macro) and exposes
//! the comparable state through its [`State`] type.
//!
//! # Example
//!
//! Given a Quint spec with a `stack: List[int]` state variable and a `push`
//! action that picks its element with `nondet x = oneOf(1.to(10))`:
//!
//! ```
//! use quint_connect::{Driver, DriverError, State, Step, switch};
//! use serde::Deserialize;
//!
//! #[derive(Debug, PartialEq, Deserialize)]
//! struct StackState {
//!     stack: Vec<i64>,
//! }
//!
//! #[derive(Default)]
//! struct StackDriver {
//!     elements: Vec<i64>,
//! }
//!
//! impl State<StackDriver> for StackState {
//!     fn from_driver(driver: &StackDriver) -> Result<Self, DriverError> {
//!         Ok(StackState { stack: driver.elements.clone() })
//!     }
//! }
//!
//! impl Driver for StackDriver {
//!     type State = StackState;
//!
//!     fn step(&mut self, step: &Step) -> Result<(), DriverError> {
//!         switch!(step {
//!             "init" => { self.elements.clear(); },
//!             "push" => {
//!                 let x: i64 = step.nondet_picks.decode("x")?;
//!                 self.elements.push(x);
//!             },
//!             "pop" => { self.elements.pop(); },
//!         })
//!     }
//! }
//! ```

use crate::error::DriverError;
use crate::step::Step;
use crate::value::Value;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt::Debug;
use std::fmt::Write;

/// Where in a trace state the step extractor finds the action and the
/// residual state. The default is the `--mbt` convention with the whole state
/// compared.
#[derive(Debug, Clone, Default)]
pub struct DriverConfig {
    /// Field path from the state root to the sub-tree to compare after each
    /// step. Empty means the whole state.
    pub state_path: Vec<String>,

    /// Field path to the sum-type record holding the fired action. Empty
    /// selects the `mbt::actionTaken`/`mbt::nondetPicks` convention.
    pub nondet_path: Vec<String>,
}

/// Core trait adapting a system-under-test to the replay engine.
///
/// A fresh driver instance is constructed per trace, so no state leaks across
/// traces.
pub trait Driver: Sized {
    /// The state type compared between spec and implementation after every
    /// step. Use [`Disabled`] to opt out of state checking.
    type State: State<Self>;

    /// Execute a single trace step against the implementation.
    ///
    /// Use the [`switch!`] macro to dispatch on `step.action_taken`.
    fn step(&mut self, step: &Step) -> Result<(), DriverError>;

    /// Declares which trace convention and paths this driver's spec uses.
    fn config(&self) -> DriverConfig {
        DriverConfig::default()
    }
}

/// State comparison between a Quint spec and a Rust implementation.
///
/// The spec side is decoded from the residual state [`Value`] via normalized
/// JSON; the Rust side is extracted from the driver. Only include fields that
/// should be compared — leave out fields where spec and implementation have
/// valid semantic differences.
pub trait State<D>: PartialEq + DeserializeOwned + Debug {
    /// Extract the comparable state from the Rust driver.
    fn from_driver(driver: &D) -> Result<Self, DriverError>;

    /// Decode the spec state from the residual state value.
    ///
    /// The default implementation normalizes the ITF encoding (`#bigint`,
    /// `#set`, ...) into plain JSON and deserializes with serde.
    fn from_spec(value: &Value) -> Result<Self, DriverError> {
        let tree = value
            .normalized()
            .map_err(|e| DriverError::StateDecode(e.to_string()))?;
        serde_json::from_value(tree).map_err(|e| DriverError::StateDecode(e.to_string()))
    }

    /// Render a human-readable diff between spec and driver states.
    ///
    /// The default is a two-sided diff: every spec line prefixed `-`, every
    /// driver line prefixed `+`. Purely diagnostic; the pass/fail decision is
    /// made by `PartialEq`.
    fn diff(&self, other: &Self) -> String {
        debug_diff(self, other)
    }
}

/// Two-sided diff between the Debug renderings of a spec-side and a
/// driver-side value. Useful for custom [`State::diff`] implementations.
pub fn debug_diff<T: Debug, U: Debug>(spec: &T, driver: &U) -> String {
    let mut out = String::new();
    out.push_str("--- specification\n");
    out.push_str("+++ implementation\n");
    for line in format!("{spec:#?}").lines() {
        let _ = writeln!(out, "-{line}");
    }
    for line in format!("{driver:#?}").lines() {
        let _ = writeln!(out, "+{line}");
    }
    out
}

/// Explicit opt-out of state checking.
///
/// Replay still executes every action; the comparison just becomes a no-op,
/// keeping the replay control flow uniform.
#[derive(Debug, PartialEq, Deserialize)]
pub struct Disabled;

impl<D> State<D> for Disabled {
    fn from_driver(_driver: &D) -> Result<Self, DriverError> {
        Ok(Disabled)
    }

    fn from_spec(_value: &Value) -> Result<Self, DriverError> {
        Ok(Disabled)
    }
}

/// Dispatch a spec action to the corresponding Rust code.
///
/// # Usage
///
/// The first argument must be an identifier bound to a `&Step`. Arms may use
/// `?` on [`NondetPicks::decode`](crate::NondetPicks::decode) results.
///
/// ```ignore
/// quint_connect::switch!(step {
///     "init" => { self.game.reset(); },
///     "move" => {
///         let square: usize = step.nondet_picks.decode("square")?;
///         self.game.play(square);
///     },
/// })
/// ```
#[macro_export]
macro_rules! switch {
    // Entry: accept identifier + braced body, delegate to internal TT muncher
    ($step:ident { $($tt:tt)+ }) => {{
        #[allow(unreachable_code)]
        {
            let __quint_step: &$crate::Step = $step;
            $crate::__switch_arms!(__quint_step; $($tt)+)
        }
    }};
}

/// Internal TT muncher for switch arms. Not part of public API.
#[macro_export]
#[doc(hidden)]
macro_rules! __switch_arms {
    // Final arm (no trailing comma)
    ($step:ident; $action:literal => $body:expr) => {
        match $step.action_taken.as_str() {
            $action => { $body; Ok(()) },
            other => Err($crate::DriverError::UnknownAction(other.to_string())),
        }
    };
    // Final arm (with trailing comma)
    ($step:ident; $action:literal => $body:expr ,) => {
        match $step.action_taken.as_str() {
            $action => { $body; Ok(()) },
            other => Err($crate::DriverError::UnknownAction(other.to_string())),
        }
    };
    // Collect arms via recursion
    ($step:ident; $action:literal => $body:expr, $($rest:tt)+) => {
        match $step.action_taken.as_str() {
            $action => { $body; Ok(()) },
            _ => $crate::__switch_arms!($step; $($rest)+),
        }
    };
}
