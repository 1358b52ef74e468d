// Copyright 2026 Cornell University
// released under MIT License

//! Plain-text summaries of a comparison run across designs.

use crate::scoreboard::Verdict;
use std::fmt;

const RULE_WIDTH: usize = 50;
const TABLE_WIDTH: usize = 46;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimStatus {
    Pass,
    Fail,
    /// the toolchain failed, so there was nothing to verify
    Error,
}

impl fmt::Display for SimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SimStatus::Pass => "PASS",
            SimStatus::Fail => "FAIL",
            SimStatus::Error => "ERROR",
        };
        // pad so that `{:<10}` works in tables
        f.pad(s)
    }
}

/// Outcome of simulating and verifying one design
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignResult {
    pub name: String,
    pub status: SimStatus,
    /// captured outputs, `None` if the simulation did not complete
    pub transactions: Option<usize>,
}

impl DesignResult {
    pub fn verified(name: impl ToString, verdict: &Verdict) -> Self {
        Self {
            name: name.to_string(),
            status: if verdict.passed {
                SimStatus::Pass
            } else {
                SimStatus::Fail
            },
            transactions: Some(verdict.transactions),
        }
    }

    pub fn errored(name: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            status: SimStatus::Error,
            transactions: None,
        }
    }
}

/// Summary block printed after each design has been simulated
pub fn format_design_summary(result: &DesignResult) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let transactions = result
        .transactions
        .map(|t| t.to_string())
        .unwrap_or_else(|| "-".to_string());
    let outcome = match result.status {
        SimStatus::Pass => format!("All {} reads matched expected values", transactions),
        SimStatus::Fail => "MISMATCH DETECTED - see diagnostics above".to_string(),
        SimStatus::Error => "Simulation did not complete".to_string(),
    };
    [
        rule.clone(),
        format!("  {} SIMULATION SUMMARY", result.name),
        rule.clone(),
        format!("  Status:       {}", result.status),
        format!("  Transactions: {}", transactions),
        format!("  Result:       {}", outcome),
        rule,
    ]
    .join("\n")
}

/// Side-by-side comparison of all designs
pub fn format_comparison_table(results: &[DesignResult]) -> String {
    let mut lines = vec![
        "=".repeat(TABLE_WIDTH),
        format!("{:<15} | {:<10} | {}", "DESIGN", "SIM", "TRANSACTIONS"),
        "-".repeat(TABLE_WIDTH),
    ];
    for r in results {
        let transactions = r
            .transactions
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!("{:<15} | {:<10} | {}", r.name, r.status, transactions));
    }
    lines.push("=".repeat(TABLE_WIDTH));
    lines.join("\n")
}
