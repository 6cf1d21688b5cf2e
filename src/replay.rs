//! ITF trace replay engine.
//!
//! Replays quint-generated traces against a [`Driver`], comparing the spec
//! state with the implementation state after every step. Replay is fail-fast:
//! the first extraction error, driver error, or state mismatch aborts the
//! remaining states and traces — one divergence is enough to reject the
//! implementation.

use crate::driver::{Driver, State};
use crate::error::ReplayError;
use crate::step::Step;
use crate::trace::Trace;
use tracing::{debug, info};

#[cfg(feature = "trace-gen")]
use crate::error::Error;
#[cfg(feature = "trace-gen")]
use crate::trace_gen::{generate_traces, GeneratorConfig};

/// Replay multiple traces against a driver.
///
/// For each trace a fresh driver instance is constructed, then for each state
/// in generation order:
///
/// 1. Derive a [`Step`] (action, nondet picks, residual state)
/// 2. Reject anonymous actions
/// 3. Execute the step via [`Driver::step`]
/// 4. Compare the spec state with the driver state; on mismatch fail with a
///    two-sided diff
///
/// Traces are replayed in the order given; states are never reordered, since
/// each step's effect is a precondition for checking the next.
pub fn replay_traces<D: Driver>(
    driver_factory: impl Fn() -> D,
    traces: &[Trace],
) -> Result<(), ReplayError> {
    info!(trace_count = traces.len(), "Replaying traces");

    for (trace_idx, trace) in traces.iter().enumerate() {
        debug!(
            trace = trace_idx,
            states = trace.states.len(),
            "Replaying trace"
        );

        let mut driver = driver_factory();
        let config = driver.config();

        for (state_idx, state_vars) in trace.states.iter().enumerate() {
            let step = Step::from_state(state_vars.clone(), &config).map_err(|source| {
                ReplayError::StepExtraction {
                    trace: trace_idx,
                    state: state_idx,
                    source,
                }
            })?;

            if step.action_taken.is_empty() {
                return Err(ReplayError::AnonymousAction {
                    trace: trace_idx,
                    state: state_idx,
                });
            }

            debug!(trace = trace_idx, state = state_idx, %step, "Executing step");

            driver
                .step(&step)
                .map_err(|source| ReplayError::StepExecution {
                    trace: trace_idx,
                    state: state_idx,
                    action: step.action_taken.clone(),
                    source,
                })?;

            let spec_state =
                D::State::from_spec(&step.state).map_err(|source| ReplayError::SpecDecode {
                    trace: trace_idx,
                    state: state_idx,
                    source,
                })?;

            let driver_state =
                D::State::from_driver(&driver).map_err(|source| ReplayError::DriverState {
                    trace: trace_idx,
                    state: state_idx,
                    source,
                })?;

            if spec_state != driver_state {
                return Err(ReplayError::StateMismatch {
                    trace: trace_idx,
                    state: state_idx,
                    action: step.action_taken,
                    diff: spec_state.diff(&driver_state),
                });
            }
        }

        debug!(trace = trace_idx, "Trace replay successful");
    }

    info!(trace_count = traces.len(), "All traces replayed successfully");
    Ok(())
}

/// Replay a single trace from a JSON string against a driver.
///
/// Convenience function for testing with inline trace data.
pub fn replay_trace_str<D: Driver>(
    driver_factory: impl Fn() -> D,
    json: &str,
) -> Result<(), ReplayError> {
    let trace = Trace::from_str(json)?;
    replay_traces(driver_factory, &[trace])
}

/// Generate traces with quint and replay them against a driver.
///
/// The one-call entry point for a model-based test. On any failure the seed
/// is logged so the run can be reproduced with `QUINT_SEED=<seed>`.
#[cfg(feature = "trace-gen")]
pub fn run_test<D: Driver>(
    driver_factory: impl Fn() -> D,
    config: &impl GeneratorConfig,
    test_name: &str,
) -> Result<(), Error> {
    info!(test = test_name, "Running model-based tests");
    info!(
        traces = config.n_traces(),
        seed = config.seed(),
        "Generating traces"
    );

    let traces = match generate_traces(config) {
        Ok(traces) => traces,
        Err(e) => {
            tracing::error!(test = test_name, seed = config.seed(), "[FAIL] {e}");
            return Err(e.into());
        }
    };

    match replay_traces(driver_factory, &traces) {
        Ok(()) => {
            info!(test = test_name, "[OK] {test_name}");
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                test = test_name,
                seed = config.seed(),
                "[FAIL] {test_name}: {e}\nReproduce this error with `QUINT_SEED={}`",
                config.seed()
            );
            Err(e.into())
        }
    }
}
