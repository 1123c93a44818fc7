//! Lock tests for on-disk artifacts: run configurations in, transcripts out.

use std::io::Write;

use wayfind_harness::config::{RunConfig, SpaceKind};
use wayfind_harness::runner::run;
use wayfind_harness::transcript::{
    read_transcript, write_transcript, Transcript, TranscriptError, TranscriptRecorder,
};
use wayfind_search::{Search, Strategy};

fn record_from(config: &RunConfig) -> Transcript {
    let space = config.autocorrect_space().unwrap();
    let mut search = Search::new(space.start_node(), config.policy().unwrap()).unwrap();
    let mut recorder = TranscriptRecorder::new(config.strategy, config.space.name());
    let report = run(&mut search, config.max_steps, &mut recorder).unwrap();
    recorder.finish(report.outcome.label())
}

#[test]
fn config_file_drives_a_reproducible_transcript() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
strategy = "iterativedeepening"
space = "autocorrect"
max_depth_bound = 3

[autocorrect]
text = "teh"
transitions = "t"
"#
    )
    .unwrap();
    let config = RunConfig::load(file.path()).unwrap();
    assert_eq!(config.strategy, Strategy::IterativeDeepening);
    assert_eq!(config.space, SpaceKind::Autocorrect);

    let transcript = record_from(&config);
    assert_eq!(transcript.outcome, "goal_reached");
    assert_eq!(transcript.records.last().unwrap().current, "the");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("teh.jsonl");
    write_transcript(&path, &transcript).unwrap();
    let back = read_transcript(&path).unwrap();
    assert_eq!(back, transcript);
    assert_eq!(back.digest().unwrap(), record_from(&config).digest().unwrap());
}

#[test]
fn transcript_lines_are_plain_json() {
    let config = RunConfig {
        space: SpaceKind::Autocorrect,
        ..RunConfig::default()
    };
    let transcript = record_from(&config);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.jsonl");
    write_transcript(&path, &transcript).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), transcript.records.len() + 2);
    assert_eq!(lines[0]["kind"], "header");
    assert_eq!(lines[0]["strategy"], "breadthfirst");
    assert_eq!(lines[1]["current"], "brithdya");
    assert_eq!(lines[1]["step"], 1);
    let footer = lines.last().unwrap();
    assert_eq!(footer["kind"], "footer");
    assert_eq!(footer["digest"], transcript.digest().unwrap());
}

#[test]
fn truncated_transcript_is_rejected() {
    let transcript = record_from(&RunConfig {
        space: SpaceKind::Autocorrect,
        ..RunConfig::default()
    });
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.jsonl");
    write_transcript(&path, &transcript).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let mut lines: Vec<&str> = text.lines().collect();
    lines.remove(1);
    std::fs::write(&path, lines.join("\n")).unwrap();
    let err = read_transcript(&path).unwrap_err();
    assert!(matches!(err, TranscriptError::DigestMismatch { .. }), "{err}");
}
