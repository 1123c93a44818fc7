//! Cross-process determinism: the `transcript_fixture` binary must print
//! identical digests under different environments, and those digests must
//! match an in-process run.

use std::process::Command;

use wayfind_harness::config::RunConfig;
use wayfind_harness::runner::run;
use wayfind_harness::transcript::TranscriptRecorder;
use wayfind_search::{Search, Strategy};

fn run_variant(env_overrides: &[(&str, &str)]) -> String {
    let bin = env!("CARGO_BIN_EXE_transcript_fixture");
    let mut command = Command::new(bin);
    command
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("LANGUAGE")
        .env_remove("RUST_LOG");
    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command
        .output()
        .unwrap_or_else(|e| panic!("failed to spawn {bin} (overrides={env_overrides:?}): {e}"));
    assert!(
        output.status.success(),
        "transcript_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

#[test]
fn crossproc_digests_are_identical_across_env_variants() {
    let baseline = run_variant(&[]);
    assert!(baseline.contains("grid.astar=sha256:"), "{baseline}");
    assert!(baseline.contains("runs=15"), "{baseline}");

    let variants: [&[(&str, &str)]; 3] = [
        &[("LC_ALL", "C")],
        &[("LANG", "en_US.UTF-8"), ("RUST_LOG", "trace")],
        &[("TZ", "Pacific/Chatham")],
    ];
    for overrides in variants {
        assert_eq!(run_variant(overrides), baseline, "variant {overrides:?} diverged");
    }
}

#[test]
fn crossproc_digest_matches_inproc() {
    let output = run_variant(&[]);
    let line = output
        .lines()
        .find(|l| l.starts_with("grid.bestfirst="))
        .expect("fixture prints grid.bestfirst");

    let config = RunConfig {
        strategy: Strategy::BestFirst,
        max_steps: Some(400),
        ..RunConfig::default()
    };
    let space = config.grid_space().unwrap();
    let mut search = Search::new(space.start_node(), config.policy().unwrap()).unwrap();
    let mut recorder = TranscriptRecorder::new(config.strategy, "grid");
    let report = run(&mut search, config.max_steps, &mut recorder).unwrap();
    let digest = recorder.finish(report.outcome.label()).digest().unwrap();

    assert_eq!(line, format!("grid.bestfirst={digest}"));
}
