//! Typed errors for quint-connect.
//!
//! Every failure is terminal for the current run: trace generation is not
//! retried (a different seed may hide a real defect) and replay stops at the
//! first divergence with as much context as possible (seed, trace index,
//! state index, path, diff).

#[cfg(feature = "trace-gen")]
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for quint-connect operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Error during quint trace generation.
    #[cfg(feature = "trace-gen")]
    #[error("Trace generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Error during ITF trace replay.
    #[error("Replay error: {0}")]
    Replay(#[from] ReplayError),

    /// Malformed ITF trace document.
    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),

    /// Error in driver step execution.
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Malformed ITF value encoding.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValueError {
    /// JSON value with no ITF counterpart (e.g. `null`).
    #[error("Unsupported JSON value in ITF trace: {found}")]
    UnsupportedJson { found: String },

    /// A plain JSON number that does not fit in an i64. ITF encodes those
    /// as `{"#bigint": "..."}`; floats have no ITF counterpart at all.
    #[error("Number does not fit in an i64 (use #bigint): {found}")]
    UnsupportedNumber { found: String },

    /// Marker object payload has the wrong shape.
    #[error("Expected {expected} as the '{marker}' payload, got: {found}")]
    MarkerPayload {
        marker: &'static str,
        expected: &'static str,
        found: String,
    },

    /// `#map` entry is not a two-element `[key, value]` array.
    #[error("Expected a [key, value] pair in the '#map' payload, got: {found}")]
    MapEntry { found: String },

    /// `#bigint` payload is not a valid integer literal.
    #[error("Invalid '#bigint' literal: {found}")]
    InvalidBigInt { found: String },

    /// Map key kind that cannot become a JSON object key.
    #[error("Cannot use a {kind} as a map key")]
    UnsupportedKeyType { kind: &'static str },
}

/// Malformed trace document or step-extraction failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TraceError {
    /// Trace JSON could not be parsed at all.
    #[error("Invalid trace JSON: {0}")]
    Json(String),

    /// Trace document root is not a JSON object.
    #[error("Trace document root is not a JSON object")]
    RootNotObject,

    /// A top-level trace field has the wrong shape.
    #[error("Trace field '{field}' has the wrong shape: expected {expected}")]
    FieldShape { field: String, expected: &'static str },

    /// A value inside a state could not be decoded.
    #[error(transparent)]
    Value(#[from] ValueError),

    /// Reserved MBT variable is absent (convention A).
    #[error("Missing `{0}` variable in the trace")]
    MissingVariable(&'static str),

    /// Reserved MBT variable holds the wrong kind of value.
    #[error("Expected `{name}` to be {expected}, got: {found}")]
    VariableShape {
        name: &'static str,
        expected: &'static str,
        found: String,
    },

    /// Sum-type action record has no string `tag` field (convention B).
    #[error("Expected action to be a sum type variant. Value found: {found}")]
    ActionNotSumType { found: String },

    /// Nondet picks value is not a record.
    #[error("Expected nondet picks to be a record, got: {found}")]
    NondetNotRecord { found: String },

    /// Unit sum-type variant carried a non-empty tuple payload.
    #[error("Expected an empty tuple for a unit sum type variant, got: {found}")]
    NonUnitTuple { found: String },

    /// Sum-type `value` payload has a shape that cannot hold picks.
    #[error("Expected nondet picks to be a sum type variant value as a record.\nValue found: {found}")]
    NondetShape { found: String },

    /// A path segment resolved against a non-record value.
    #[error("Cannot read '{segment}' from a non-record value in path '{path}'\nCurrent value: {found}")]
    PathNotRecord {
        segment: String,
        path: String,
        found: String,
    },

    /// A path segment is absent from the record being descended.
    #[error("Cannot find a value at '{segment}' in path '{path}'\nCurrent value: {found}")]
    PathMissing {
        segment: String,
        path: String,
        found: String,
    },

    /// The nondet path did not lead to a record.
    #[error("Cannot find a record at '{segment}' in path '{path}'\nCurrent state: {found}")]
    RecordNotAtPath {
        segment: String,
        path: String,
        found: String,
    },
}

/// Error while decoding a nondet pick into a caller type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PickError {
    /// Required pick was never made by the action.
    #[error("Missing required nondet pick '{0}'")]
    Missing(String),

    /// Pick value could not be decoded into the target type.
    #[error("Failed to decode nondet pick '{name}': {reason}")]
    Decode { name: String, reason: String },
}

/// Error during driver step execution or state extraction.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DriverError {
    /// The trace named an action the driver does not dispatch.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// Action execution failed inside the implementation.
    #[error("Action '{action}' failed: {reason}")]
    ActionFailed { action: String, reason: String },

    /// Expected state could not be decoded into the driver's state type.
    #[error("Failed to decode spec state: {0}")]
    StateDecode(String),

    /// Observable state could not be extracted from the driver.
    #[error("Failed to extract driver state: {0}")]
    StateExtraction(String),

    /// A nondet pick decode failed inside a `switch!` arm.
    #[error(transparent)]
    Pick(#[from] PickError),
}

/// Error during ITF trace replay. Variants carry the trace and state indices
/// the failure occurred at.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReplayError {
    /// Failed to parse an inline trace document.
    #[error("Failed to parse ITF trace: {0}")]
    Parse(#[from] TraceError),

    /// Failed to derive a step from a trace state.
    #[error("Trace {trace}, state {state}: failed to derive step: {source}")]
    StepExtraction {
        trace: usize,
        state: usize,
        #[source]
        source: TraceError,
    },

    /// The extracted action has an empty name, which signals a specification
    /// defect rather than a driver bug.
    #[error("Trace {trace}, state {state}: an anonymous action was found. Make sure all actions in the specification are properly named")]
    AnonymousAction { trace: usize, state: usize },

    /// The driver failed to execute an action.
    #[error("Trace {trace}, state {state}: failed to execute action '{action}': {source}")]
    StepExecution {
        trace: usize,
        state: usize,
        action: String,
        #[source]
        source: DriverError,
    },

    /// Expected state could not be decoded.
    #[error("Trace {trace}, state {state}: failed to decode spec state: {source}")]
    SpecDecode {
        trace: usize,
        state: usize,
        #[source]
        source: DriverError,
    },

    /// Driver state could not be extracted.
    #[error("Trace {trace}, state {state}: failed to extract driver state: {source}")]
    DriverState {
        trace: usize,
        state: usize,
        #[source]
        source: DriverError,
    },

    /// Spec and driver states diverged.
    #[error("State mismatch at trace {trace}, state {state} (action: '{action}'):\n{diff}")]
    StateMismatch {
        trace: usize,
        state: usize,
        action: String,
        diff: String,
    },
}

/// Error during quint trace generation.
#[cfg(feature = "trace-gen")]
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    /// Failed to create the temp output directory.
    #[error("Failed to create temp directory: {0}")]
    TempDir(String),

    /// quint binary not found or not executable.
    #[error("Failed to execute quint. Is it installed and on PATH? {0}")]
    QuintNotFound(String),

    /// quint exited with a nonzero status. Carries the seed so the failing
    /// scenario can be reproduced.
    #[error("quint returned a non-zero exit code (seed {seed}):\n{stderr}")]
    NonZeroExit { seed: String, stderr: String },

    /// quint succeeded but produced no trace files.
    #[error("Trace generation produced zero traces (seed {seed}).\nPlease check your specification and/or your test configuration")]
    NoTraces { seed: String },

    /// Failed to read the output directory or a trace file.
    #[error("Failed to read trace output {path}: {reason}")]
    OutputRead { path: PathBuf, reason: String },

    /// A generated trace file could not be parsed.
    #[error("Failed to parse trace {path}: {source}")]
    TraceParse {
        path: PathBuf,
        #[source]
        source: TraceError,
    },
}
