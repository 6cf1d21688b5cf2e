//! Quint CLI trace generation.
//!
//! Invokes the quint CLI to produce ITF traces, either by random simulation
//! (`quint run --mbt`) or by sampling a spec test (`quint test`). The
//! subprocess writes trace files to a temp directory that is cleaned up on
//! every exit path.

use crate::error::{GenerationError, TraceError};
use crate::trace::Trace;
use std::path::Path;
use tracing::{debug, info};

/// Default number of trace samples when the config does not bound them.
pub const DEFAULT_TRACES: usize = 100;

/// A configuration that knows how to ask quint for traces.
///
/// Implemented by [`RunConfig`] and [`TestConfig`]; implement it yourself to
/// drive a different quint subcommand.
pub trait GeneratorConfig {
    /// The random seed for this run, surfaced on failure for reproduction.
    fn seed(&self) -> &str;

    /// Upper bound on the number of traces generated.
    fn n_traces(&self) -> usize;

    /// The full argv (program name first) to invoke, writing ITF trace files
    /// into `out_dir`.
    fn to_args(&self, out_dir: &Path) -> Vec<String>;
}

/// Configuration for `quint run` trace generation.
///
/// See the [quint CLI docs](https://quint-lang.org/docs/cli#quint-run) for
/// the meaning of each selector.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Path to the Quint spec file.
    pub spec: String,

    /// Name of the main module (optional).
    pub main: Option<String>,

    /// Name of the init action (optional).
    pub init: Option<String>,

    /// Name of the step action (optional).
    pub step: Option<String>,

    /// Maximum number of runs to sample (default [`DEFAULT_TRACES`]).
    pub max_samples: Option<usize>,

    /// Maximum number of steps per run (optional).
    pub max_steps: Option<usize>,

    /// Random seed; defaults to `QUINT_SEED` or a fresh random seed.
    pub seed: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            spec: String::new(),
            main: None,
            init: None,
            step: None,
            max_samples: None,
            max_steps: None,
            seed: gen_seed(),
        }
    }
}

impl GeneratorConfig for RunConfig {
    fn seed(&self) -> &str {
        &self.seed
    }

    fn n_traces(&self) -> usize {
        self.max_samples.unwrap_or(DEFAULT_TRACES)
    }

    fn to_args(&self, out_dir: &Path) -> Vec<String> {
        let mut args = vec![
            "quint".into(),
            "run".into(),
            self.spec.clone(),
            "--seed".into(),
            self.seed.clone(),
            "--max-samples".into(),
            self.n_traces().to_string(),
            "--n-traces".into(),
            self.n_traces().to_string(),
            "--out-itf".into(),
            out_dir.join("run_{seq}.itf.json").display().to_string(),
            "--mbt".into(),
            "--verbosity".into(),
            "0".into(),
        ];
        if let Some(ref main) = self.main {
            args.extend(["--main".into(), main.clone()]);
        }
        if let Some(ref init) = self.init {
            args.extend(["--init".into(), init.clone()]);
        }
        if let Some(ref step) = self.step {
            args.extend(["--step".into(), step.clone()]);
        }
        if let Some(max_steps) = self.max_steps {
            args.extend(["--max-steps".into(), max_steps.to_string()]);
        }
        args
    }
}

/// Configuration for `quint test` trace generation.
///
/// See the [quint CLI docs](https://quint-lang.org/docs/cli#quint-test).
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Path to the Quint spec file.
    pub spec: String,

    /// Name of the run to sample; matched exactly.
    pub test: String,

    /// Name of the main module (optional).
    pub main: Option<String>,

    /// Maximum number of samples (default [`DEFAULT_TRACES`]).
    pub max_samples: Option<usize>,

    /// Random seed; defaults to `QUINT_SEED` or a fresh random seed.
    pub seed: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            spec: String::new(),
            test: String::new(),
            main: None,
            max_samples: None,
            seed: gen_seed(),
        }
    }
}

impl GeneratorConfig for TestConfig {
    fn seed(&self) -> &str {
        &self.seed
    }

    fn n_traces(&self) -> usize {
        self.max_samples.unwrap_or(DEFAULT_TRACES)
    }

    fn to_args(&self, out_dir: &Path) -> Vec<String> {
        let mut args = vec![
            "quint".into(),
            "test".into(),
            self.spec.clone(),
            "--seed".into(),
            self.seed.clone(),
            "--match".into(),
            format!("^{}$", self.test),
            "--max-samples".into(),
            self.n_traces().to_string(),
            "--out-itf".into(),
            out_dir.join("test_{seq}.itf.json").display().to_string(),
            "--verbosity".into(),
            "0".into(),
        ];
        if let Some(ref main) = self.main {
            args.extend(["--main".into(), main.clone()]);
        }
        args
    }
}

/// The seed for a generation run: `QUINT_SEED` from the environment, or a
/// fresh random hex seed.
pub fn gen_seed() -> String {
    std::env::var("QUINT_SEED").unwrap_or_else(|_| format!("{:#x}", rand::random::<u64>()))
}

/// Generate ITF traces by invoking quint.
///
/// Blocks until the subprocess exits. Traces are returned sorted
/// lexicographically by filename, which matches quint's `{seq}` numbering, so
/// the caller-visible order is stable. A nonzero exit or an empty output
/// directory is a [`GenerationError`] carrying the seed.
pub fn generate_traces(config: &impl GeneratorConfig) -> Result<Vec<Trace>, GenerationError> {
    let tmp = tempfile::tempdir().map_err(|e| GenerationError::TempDir(e.to_string()))?;

    let args = config.to_args(tmp.path());
    if args.is_empty() {
        return Err(GenerationError::QuintNotFound(
            "config produced an empty argv".into(),
        ));
    }
    debug!(?args, "Invoking quint");

    let output = std::process::Command::new(&args[0])
        .args(&args[1..])
        .output()
        .map_err(|e| GenerationError::QuintNotFound(e.to_string()))?;

    if !output.status.success() {
        return Err(GenerationError::NonZeroExit {
            seed: config.seed().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let traces = read_traces(tmp.path())?;
    if traces.is_empty() {
        return Err(GenerationError::NoTraces {
            seed: config.seed().to_string(),
        });
    }

    info!(count = traces.len(), "Collected ITF traces");
    Ok(traces)
}

/// Parse all `.itf.json` files in a directory, sorted by filename.
fn read_traces(dir: &Path) -> Result<Vec<Trace>, GenerationError> {
    let read_err = |e: std::io::Error| GenerationError::OutputRead {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    };

    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .map_err(read_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_err)?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".itf.json"))
        })
        .collect();
    paths.sort();

    let mut traces = Vec::with_capacity(paths.len());
    for path in paths {
        debug!(path = %path.display(), "Found ITF trace file");
        let content = std::fs::read_to_string(&path).map_err(|e| GenerationError::OutputRead {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let trace = Trace::from_str(&content).map_err(|source: TraceError| {
            GenerationError::TraceParse {
                path: path.clone(),
                source,
            }
        })?;
        traces.push(trace);
    }
    Ok(traces)
}
