// Copyright 2026 Cornell University
// released under MIT License

use std::path::PathBuf;
use thiserror::Error;

/// Errors that prevent the scoreboard from producing a verdict.
/// A data mismatch is *not* an error, see `scoreboard::Verdict`.
#[derive(Error, Debug)]
pub enum ScoreboardError {
    /// The stimulus trace does not exist
    #[error("Stimulus file missing")]
    MissingStimulus(PathBuf),
    /// The response trace does not exist, usually because the simulation
    /// crashed before it wrote anything
    #[error("Response file missing (sim failed)")]
    MissingResponse(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A trace line that does not have enough fields to form a record.
/// These are skipped while parsing and kept around for diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: expected at least {expected} fields, found {found}")]
pub struct MalformedRecordError {
    /// 1-based line number
    pub line: usize,
    /// byte range of the line in the trace text
    pub span: (usize, usize),
    pub expected: usize,
    pub found: usize,
}

/// Errors raised while driving the external simulator.
#[derive(Error, Debug)]
pub enum ToolchainError {
    #[error("failed to find `{0}`, make sure the simulator tools are on your path or pass --tool-dir")]
    ToolNotFound(String),
    #[error("failed to execute command: `{0}`\n{1}\n{2}")]
    FailedToExecuteCommand(String, String, String),
    #[error("no output generated: {0}")]
    OutputMissing(String),
    #[error("failed to perform i/o: {0}")]
    IoError(#[from] std::io::Error),
}
