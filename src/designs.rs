// Copyright 2026 Cornell University
// released under MIT License

//! # Designs under test
//! Both FIFO variants share one unified testbench; the dual-clock variant is
//! selected with a compile-time define.

use std::fmt;
use std::path::{Path, PathBuf};

/// The FIFO variants we know how to simulate
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Variant {
    /// single-clock FIFO
    Sync,
    /// dual-clock FIFO
    Async,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Sync => write!(f, "sync"),
            Variant::Async => write!(f, "async"),
        }
    }
}

/// Everything needed to compile and elaborate one design with its testbench
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Design {
    /// Human readable name, used in summaries
    pub name: String,
    /// RTL source of the FIFO
    pub rtl: PathBuf,
    /// Testbench source
    pub testbench: PathBuf,
    /// Top-level module passed to the elaborator
    pub sim_top: String,
    /// Verilog defines passed to the compiler (`-d NAME`)
    pub defines: Vec<String>,
}

pub const UNIFIED_TESTBENCH: &str = "tb_fifo_unified.sv";
pub const UNIFIED_TESTBENCH_TOP: &str = "tb_fifo_unified";

impl Design {
    /// Builds the design description for `variant`, with RTL sources taken
    /// from `rtl_dir` and the testbench from `tb_dir`
    pub fn for_variant(variant: Variant, rtl_dir: &Path, tb_dir: &Path) -> Self {
        let (name, rtl, defines) = match variant {
            Variant::Sync => ("Sync FIFO", "fifo_sync.sv", vec![]),
            Variant::Async => ("Async FIFO", "fifo_async.sv", vec!["ASYNC_MODE".to_string()]),
        };
        Self {
            name: name.to_string(),
            rtl: rtl_dir.join(rtl),
            testbench: tb_dir.join(UNIFIED_TESTBENCH),
            sim_top: UNIFIED_TESTBENCH_TOP.to_string(),
            defines,
        }
    }
}
