// Copyright 2026 Cornell University
// released under MIT License

pub mod designs;
pub mod diagnostic;
pub mod errors;
pub mod golden;
pub mod response;
pub mod scoreboard;
pub mod signal;
pub mod stimulus;
pub mod summary;
pub mod toolchain;
pub mod trace;

pub use scoreboard::{verify, ScoreboardConfig, Verdict};
