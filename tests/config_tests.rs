//! Tests for quint CLI command construction and generation failure modes.

#![cfg(feature = "trace-gen")]

use quint_connect::{generate_traces, GenerationError, GeneratorConfig, RunConfig, TestConfig};
use std::path::Path;

fn args(config: &impl GeneratorConfig) -> Vec<String> {
    config.to_args(Path::new("tmpdir"))
}

#[test]
fn run_config_basic_command() {
    let config = RunConfig {
        spec: "foo.qnt".into(),
        seed: "42".into(),
        ..Default::default()
    };
    assert_eq!(
        args(&config),
        vec![
            "quint",
            "run",
            "foo.qnt",
            "--seed",
            "42",
            "--max-samples",
            "100",
            "--n-traces",
            "100",
            "--out-itf",
            "tmpdir/run_{seq}.itf.json",
            "--mbt",
            "--verbosity",
            "0",
        ]
    );
}

#[test]
fn run_config_with_all_options() {
    let config = RunConfig {
        spec: "foo.qnt".into(),
        seed: "42".into(),
        main: Some("MyModule".into()),
        init: Some("myInit".into()),
        step: Some("myStep".into()),
        max_samples: Some(50),
        max_steps: Some(20),
    };
    assert_eq!(
        args(&config),
        vec![
            "quint",
            "run",
            "foo.qnt",
            "--seed",
            "42",
            "--max-samples",
            "50",
            "--n-traces",
            "50",
            "--out-itf",
            "tmpdir/run_{seq}.itf.json",
            "--mbt",
            "--verbosity",
            "0",
            "--main",
            "MyModule",
            "--init",
            "myInit",
            "--step",
            "myStep",
            "--max-steps",
            "20",
        ]
    );
}

#[test]
fn test_config_basic_command() {
    let config = TestConfig {
        spec: "foo.qnt".into(),
        test: "happyTest".into(),
        seed: "42".into(),
        ..Default::default()
    };
    assert_eq!(
        args(&config),
        vec![
            "quint",
            "test",
            "foo.qnt",
            "--seed",
            "42",
            "--match",
            "^happyTest$",
            "--max-samples",
            "100",
            "--out-itf",
            "tmpdir/test_{seq}.itf.json",
            "--verbosity",
            "0",
        ]
    );
}

#[test]
fn test_config_with_main() {
    let config = TestConfig {
        spec: "foo.qnt".into(),
        test: "myTest".into(),
        main: Some("tests".into()),
        seed: "42".into(),
        ..Default::default()
    };
    assert_eq!(
        args(&config),
        vec![
            "quint",
            "test",
            "foo.qnt",
            "--seed",
            "42",
            "--match",
            "^myTest$",
            "--max-samples",
            "100",
            "--out-itf",
            "tmpdir/test_{seq}.itf.json",
            "--verbosity",
            "0",
            "--main",
            "tests",
        ]
    );
}

/// A config that runs an arbitrary command instead of quint, for exercising
/// the generation failure paths without a quint installation.
struct StubConfig {
    argv: Vec<String>,
    seed: String,
}

impl GeneratorConfig for StubConfig {
    fn seed(&self) -> &str {
        &self.seed
    }

    fn n_traces(&self) -> usize {
        1
    }

    fn to_args(&self, _out_dir: &Path) -> Vec<String> {
        self.argv.clone()
    }
}

#[test]
fn zero_traces_is_a_generation_failure() {
    // The command succeeds but writes no trace files; replay must never be
    // reached and the error must carry the seed.
    let config = StubConfig {
        argv: vec!["true".into()],
        seed: "0xfeed".into(),
    };
    let err = generate_traces(&config).unwrap_err();
    assert!(
        matches!(err, GenerationError::NoTraces { ref seed } if seed == "0xfeed"),
        "got: {err}"
    );
}

#[test]
fn nonzero_exit_carries_seed() {
    let config = StubConfig {
        argv: vec!["false".into()],
        seed: "0xdead".into(),
    };
    let err = generate_traces(&config).unwrap_err();
    assert!(
        matches!(err, GenerationError::NonZeroExit { ref seed, .. } if seed == "0xdead"),
        "got: {err}"
    );
}

#[test]
fn empty_argv_is_rejected() {
    let config = StubConfig {
        argv: vec![],
        seed: "0x1".into(),
    };
    let err = generate_traces(&config).unwrap_err();
    assert!(matches!(err, GenerationError::QuintNotFound(_)), "got: {err}");
}

#[test]
fn seed_env_var_wins() {
    // gen_seed reads QUINT_SEED; without it the seed is random hex.
    std::env::remove_var("QUINT_SEED");
    let seed = quint_connect::gen_seed();
    assert!(seed.starts_with("0x"), "got: {seed}");

    std::env::set_var("QUINT_SEED", "0xabc");
    assert_eq!(quint_connect::gen_seed(), "0xabc");
    std::env::remove_var("QUINT_SEED");
}
