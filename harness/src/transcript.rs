//! Step transcripts: one canonical JSON line per snapshot, plus a digest.
//!
//! # File layout
//!
//! ```text
//! {"kind":"header","space":"grid","strategy":"astar"}
//! {"current":"(12,12)","depth_bound":null,"frontier":[...],"goal":false,
//!  "kind":"step","step":1,"visited_count":1}
//! ...
//! {"digest":"sha256:...","kind":"footer","outcome":"goal_reached"}
//! ```
//!
//! Each line sits on one physical line in the file; the step line above is
//! wrapped for display only.
//!
//! Nodes are recorded by their `Display` label. The digest covers the
//! header, every step line and the footer's outcome, so two runs are
//! step-for-step identical with the same ending exactly when their digests
//! match.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use wayfind_search::{Snapshot, Strategy};

use crate::digest::{canonical_json_bytes, CanonError, DigestWriter, DOMAIN_TRANSCRIPT};
use crate::runner::{Control, StepObserver};

#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("transcript I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("transcript line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Canon(#[from] CanonError),

    #[error("malformed transcript: {detail}")]
    Malformed { detail: String },

    #[error("transcript digest mismatch: footer says {recorded}, content hashes to {computed}")]
    DigestMismatch { recorded: String, computed: String },
}

/// One snapshot, by label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: u64,
    /// Whether `current` is the goal (the `Goal` step).
    pub goal: bool,
    pub current: String,
    pub visited_count: u64,
    pub frontier: Vec<String>,
    pub depth_bound: Option<u32>,
}

impl StepRecord {
    #[must_use]
    pub fn from_snapshot<N: Display + Clone + Eq + std::hash::Hash>(step: u64, goal: bool, snapshot: &Snapshot<N>) -> Self {
        Self {
            step,
            goal,
            current: snapshot.current.to_string(),
            visited_count: snapshot.visited.len() as u64,
            frontier: snapshot
                .frontier
                .nodes()
                .iter()
                .map(ToString::to_string)
                .collect(),
            depth_bound: snapshot.depth_bound,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Line {
    Header { strategy: Strategy, space: String },
    Step(StepRecord),
    Footer { outcome: String, digest: String },
}

fn line_bytes(line: &Line) -> Result<Vec<u8>, TranscriptError> {
    let value =
        serde_json::to_value(line).map_err(|source| TranscriptError::Json { line: 0, source })?;
    Ok(canonical_json_bytes(&value)?)
}

/// A complete run, in step order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub strategy: Strategy,
    pub space: String,
    pub records: Vec<StepRecord>,
    /// [`crate::runner::RunOutcome::label`] of the run.
    pub outcome: String,
}

impl Transcript {
    fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        let header = Line::Header {
            strategy: self.strategy,
            space: self.space.clone(),
        };
        std::iter::once(header).chain(self.records.iter().cloned().map(Line::Step))
    }

    /// `sha256:<hex>` over the canonical header and step lines, then the
    /// outcome label.
    ///
    /// # Errors
    ///
    /// Fails only if a line cannot be canonicalized.
    pub fn digest(&self) -> Result<String, TranscriptError> {
        self.encode(|_| {})
    }

    /// Hash every line in order, handing each line's bytes to `sink`.
    fn encode(&self, mut sink: impl FnMut(&[u8])) -> Result<String, TranscriptError> {
        let mut digest = DigestWriter::new(DOMAIN_TRANSCRIPT);
        for line in self.lines() {
            let bytes = line_bytes(&line)?;
            digest.update(&bytes);
            sink(&bytes);
        }
        digest.update(self.outcome.as_bytes());
        Ok(digest.finish())
    }

    /// The full file: canonical JSON lines, footer last.
    ///
    /// # Errors
    ///
    /// Fails only if a line cannot be canonicalized.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TranscriptError> {
        let mut out = Vec::new();
        let digest = self.encode(|bytes| {
            out.extend_from_slice(bytes);
            out.push(b'\n');
        })?;
        let footer = Line::Footer {
            outcome: self.outcome.clone(),
            digest,
        };
        out.extend_from_slice(&line_bytes(&footer)?);
        out.push(b'\n');
        Ok(out)
    }
}

/// Write `transcript` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`TranscriptError::Io`] on write failure.
pub fn write_transcript(path: &Path, transcript: &Transcript) -> Result<(), TranscriptError> {
    let bytes = transcript.to_bytes()?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(&bytes)?;
    file.flush()?;
    Ok(())
}

/// Read and verify a transcript written by [`write_transcript`].
///
/// # Errors
///
/// Returns [`TranscriptError::Malformed`] if the header or footer is
/// missing or out of place, and [`TranscriptError::DigestMismatch`] if the
/// content was altered.
pub fn read_transcript(path: &Path) -> Result<Transcript, TranscriptError> {
    let file = std::fs::File::open(path)?;
    let mut header = None;
    let mut records = Vec::new();
    let mut footer = None;

    for (index, text) in std::io::BufReader::new(file).lines().enumerate() {
        let text = text?;
        if text.is_empty() {
            continue;
        }
        let line: Line = serde_json::from_str(&text).map_err(|source| TranscriptError::Json {
            line: index + 1,
            source,
        })?;
        if footer.is_some() {
            return Err(malformed(format!("line {} follows the footer", index + 1)));
        }
        match line {
            Line::Header { strategy, space } if header.is_none() && index == 0 => {
                header = Some((strategy, space));
            }
            Line::Header { .. } => {
                return Err(malformed(format!("stray header on line {}", index + 1)));
            }
            Line::Step(_) if header.is_none() => return Err(malformed("step before header")),
            Line::Step(record) => records.push(record),
            Line::Footer { outcome, digest } => footer = Some((outcome, digest)),
        }
    }

    let (strategy, space) = header.ok_or_else(|| malformed("missing header"))?;
    let (outcome, recorded) = footer.ok_or_else(|| malformed("missing footer"))?;
    let transcript = Transcript {
        strategy,
        space,
        records,
        outcome,
    };
    let computed = transcript.digest()?;
    if computed != recorded {
        return Err(TranscriptError::DigestMismatch { recorded, computed });
    }
    Ok(transcript)
}

fn malformed(detail: impl Into<String>) -> TranscriptError {
    TranscriptError::Malformed {
        detail: detail.into(),
    }
}

/// Observer that records every snapshot.
#[derive(Debug)]
pub struct TranscriptRecorder {
    strategy: Strategy,
    space: String,
    records: Vec<StepRecord>,
}

impl TranscriptRecorder {
    #[must_use]
    pub fn new(strategy: Strategy, space: impl Into<String>) -> Self {
        Self {
            strategy,
            space: space.into(),
            records: Vec::new(),
        }
    }

    /// Record one snapshot. `goal` marks the `Goal` step.
    pub fn record<N: Display + Clone + Eq + std::hash::Hash>(&mut self, step: u64, goal: bool, snapshot: &Snapshot<N>) {
        self.records.push(StepRecord::from_snapshot(step, goal, snapshot));
    }

    #[must_use]
    pub fn finish(self, outcome: impl Into<String>) -> Transcript {
        Transcript {
            strategy: self.strategy,
            space: self.space,
            records: self.records,
            outcome: outcome.into(),
        }
    }
}

/// The runner does not say which step is the goal step; it is the one
/// whose `current` satisfies the goal test.
impl<N: wayfind_search::SearchNode + Display> StepObserver<N> for TranscriptRecorder {
    fn on_step(&mut self, step: u64, snapshot: &Snapshot<N>) -> Control {
        self.record(step, snapshot.current.is_goal(), snapshot);
        Control::Continue
    }
}
