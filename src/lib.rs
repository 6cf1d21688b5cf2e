//! quint-connect: Quint/ITF integration for model-based testing.
//!
//! Bridges a formally-specified [Quint](https://quint-lang.org) state machine
//! and a Rust implementation: quint generates ITF execution traces, which are
//! replayed step by step against a Rust [`Driver`], asserting after every
//! step that the implementation's observable state matches the spec's.
//!
//! # Quick Start
//!
//! ```ignore
//! use quint_connect::*;
//! use serde::Deserialize;
//!
//! #[derive(Debug, PartialEq, Deserialize)]
//! struct MyState { /* spec vars to compare */ }
//!
//! impl State<MyDriver> for MyState {
//!     fn from_driver(driver: &MyDriver) -> Result<Self, DriverError> { /* ... */ }
//! }
//!
//! struct MyDriver { /* Rust type under test */ }
//!
//! impl Driver for MyDriver {
//!     type State = MyState;
//!     fn step(&mut self, step: &Step) -> Result<(), DriverError> {
//!         switch!(step {
//!             "init" => { /* init */ },
//!             "action1" => {
//!                 let n: i64 = step.nondet_picks.decode("n")?;
//!                 /* ... */
//!             },
//!         })
//!     }
//! }
//!
//! run_test(
//!     MyDriver::default,
//!     &RunConfig { spec: "spec/my_spec.qnt".into(), ..Default::default() },
//!     "my_spec",
//! )?;
//! ```
//!
//! Failures are terminal and carry everything needed to reproduce them: the
//! generation seed, the trace and state indices, and a state diff.

pub mod driver;
pub mod error;
pub mod nondet;
pub mod replay;
pub mod step;
pub mod trace;
#[cfg(feature = "trace-gen")]
pub mod trace_gen;
pub mod value;

// Re-export core types for convenience
pub use driver::{debug_diff, Disabled, Driver, DriverConfig, State};
pub use error::{DriverError, Error, PickError, ReplayError, TraceError, ValueError};
pub use nondet::NondetPicks;
pub use replay::{replay_trace_str, replay_traces};
pub use step::Step;
pub use trace::Trace;
pub use value::Value;

#[cfg(feature = "trace-gen")]
pub use error::GenerationError;
#[cfg(feature = "trace-gen")]
pub use replay::run_test;
#[cfg(feature = "trace-gen")]
pub use trace_gen::{gen_seed, generate_traces, GeneratorConfig, RunConfig, TestConfig};
