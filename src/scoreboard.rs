// Copyright 2026 Cornell University
// released under MIT License

//! # Scoreboard
//! Replays a stimulus trace against the golden FIFO model and compares the
//! values the model expects to be read with the values the DUT actually
//! produced, in order.

use crate::errors::{MalformedRecordError, ScoreboardError};
use crate::golden::GoldenFifo;
use crate::response::{
    captured_outputs, parse_responses, CapturedOutput, ResponseFormat, ResponseRecord,
};
use crate::signal::BusValue;
use crate::stimulus::{parse_stimulus, StimulusRecord};
use crate::trace::{read_trace_file, Trace};
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};

/// Default FIFO depth of both designs under test
pub const DEFAULT_DEPTH: usize = 32;

/// Parameters of a verification run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreboardConfig {
    /// capacity of the golden FIFO, must match the DUT
    pub depth: usize,
    /// layout of the response trace
    pub format: ResponseFormat,
}

impl Default for ScoreboardConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            format: ResponseFormat::default(),
        }
    }
}

/// Where expected and actual outputs first disagree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// Different values at the same position
    Value {
        index: usize,
        expected: BusValue,
        actual: CapturedOutput,
    },
    /// All common positions agree, but one side has more values
    Count { expected: usize, actual: usize },
}

impl Mismatch {
    pub fn index(&self) -> usize {
        match self {
            Mismatch::Value { index, .. } => *index,
            Mismatch::Count { expected, actual } => *expected.min(actual),
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Value {
                index,
                expected,
                actual,
            } => write!(
                f,
                "First mismatch at index {}: Exp {}, Got {} (response line {})",
                index, expected, actual.value, actual.line
            ),
            Mismatch::Count { expected, actual } => {
                write!(f, "Expected {} reads, got {}", expected, actual)
            }
        }
    }
}

/// The outcome of a verification run. A failed comparison is a normal result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub passed: bool,
    /// number of outputs captured from the response trace
    pub transactions: usize,
    /// number of outputs predicted by the golden model
    pub expected: usize,
    /// the first disagreement, `None` iff `passed`
    pub mismatch: Option<Mismatch>,
}

impl Verdict {
    /// `(passed, transaction_count)`
    pub fn outcome(&self) -> (bool, usize) {
        (self.passed, self.transactions)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed {
            write!(f, "PASS: {} transactions verified!", self.transactions)
        } else {
            write!(f, "FAIL: Data mismatch detected.")
        }
    }
}

/// Runs the stimulus through a fresh golden FIFO and returns the values
/// it reads out, in order
pub fn replay<'a>(
    stimulus: impl IntoIterator<Item = &'a StimulusRecord>,
    depth: usize,
) -> Vec<BusValue> {
    let mut fifo = GoldenFifo::new(depth);
    stimulus
        .into_iter()
        .filter_map(|stim| fifo.step(stim))
        .collect()
}

/// Finds the first disagreement between `expected` and `actual`
pub fn compare(expected: &[BusValue], actual: &[CapturedOutput]) -> Option<Mismatch> {
    let value_mismatch = expected
        .iter()
        .zip(actual)
        .position(|(exp, act)| *exp != act.value)
        .map(|index| Mismatch::Value {
            index,
            expected: expected[index].clone(),
            actual: actual[index].clone(),
        });

    value_mismatch.or_else(|| {
        (expected.len() != actual.len()).then_some(Mismatch::Count {
            expected: expected.len(),
            actual: actual.len(),
        })
    })
}

/// Verifies parsed traces against each other
pub fn verify_traces(
    stimulus: &Trace<StimulusRecord>,
    responses: &Trace<ResponseRecord>,
    depth: usize,
) -> Verdict {
    let expected = replay(stimulus.records(), depth);
    let actual = captured_outputs(responses);
    debug!(
        "replayed {} stimulus cycles, {} expected reads, {} captured outputs",
        stimulus.len(),
        expected.len(),
        actual.len()
    );

    let mismatch = compare(&expected, &actual);
    if let Some(m) = &mismatch {
        debug!("{}", m);
    }

    Verdict {
        passed: mismatch.is_none(),
        transactions: actual.len(),
        expected: expected.len(),
        mismatch,
    }
}

/// Both traces of a run, read from disk and parsed
#[derive(Debug)]
pub struct LoadedTraces {
    pub stimulus_path: PathBuf,
    pub stimulus_text: String,
    pub stimulus: Trace<StimulusRecord>,
    pub response_path: PathBuf,
    pub response_text: String,
    pub responses: Trace<ResponseRecord>,
}

impl LoadedTraces {
    /// Lines skipped in either trace, stimulus first
    pub fn malformed(&self) -> impl Iterator<Item = (&Path, &MalformedRecordError)> + '_ {
        let stim = self
            .stimulus
            .malformed
            .iter()
            .map(|m| (self.stimulus_path.as_path(), m));
        let resp = self
            .responses
            .malformed
            .iter()
            .map(|m| (self.response_path.as_path(), m));
        stim.chain(resp)
    }
}

fn read_existing(path: &Path) -> Result<String, ScoreboardError> {
    read_trace_file(path).map_err(|source| ScoreboardError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads and parses both traces. A missing stimulus file is reported before
/// a missing response file.
pub fn load_traces(
    stimulus_path: impl AsRef<Path>,
    response_path: impl AsRef<Path>,
    format: ResponseFormat,
) -> Result<LoadedTraces, ScoreboardError> {
    let stimulus_path = stimulus_path.as_ref();
    let response_path = response_path.as_ref();
    if !stimulus_path.exists() {
        return Err(ScoreboardError::MissingStimulus(stimulus_path.to_path_buf()));
    }
    if !response_path.exists() {
        return Err(ScoreboardError::MissingResponse(response_path.to_path_buf()));
    }

    let stimulus_text = read_existing(stimulus_path)?;
    let response_text = read_existing(response_path)?;
    let stimulus = parse_stimulus(&stimulus_text);
    let responses = parse_responses(&response_text, format);
    info!(
        "loaded {} stimulus and {} response records",
        stimulus.len(),
        responses.len()
    );

    Ok(LoadedTraces {
        stimulus_path: stimulus_path.to_path_buf(),
        stimulus_text,
        stimulus,
        response_path: response_path.to_path_buf(),
        response_text,
        responses,
    })
}

/// Verifies the response trace at `response_path` against the stimulus
/// trace at `stimulus_path`
pub fn verify(
    stimulus_path: impl AsRef<Path>,
    response_path: impl AsRef<Path>,
    config: &ScoreboardConfig,
) -> Result<Verdict, ScoreboardError> {
    let traces = load_traces(stimulus_path, response_path, config.format)?;
    Ok(verify_traces(&traces.stimulus, &traces.responses, config.depth))
}
