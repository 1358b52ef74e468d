// Copyright 2026 Cornell University
// released under MIT License

//! # Response traces
//! The testbench records what the FIFO did on every cycle. Two layouts exist:
//! - *legacy*: one value per line, the read data bus on that cycle
//! - *flow-controlled*: `write_clock_tick reset_n write_enable read_enable write_full read_empty read_data`
//!
//! The layout is never guessed from the number of fields. Callers pick one
//! with `ResponseFormat`.

use crate::signal::{BusValue, Logic};
use crate::trace::{split_records, Trace, TraceLine};

/// Number of fields in a flow-controlled response line
pub const FLOW_CONTROLLED_FIELDS: usize = 7;

/// Layout of a response trace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ResponseFormat {
    /// One read-data value per line, every line counts as an output
    Legacy,
    /// Seven fields per line, only valid reads count as outputs
    #[default]
    FlowControlled,
}

impl ResponseFormat {
    pub fn min_fields(self) -> usize {
        match self {
            ResponseFormat::Legacy => 1,
            ResponseFormat::FlowControlled => FLOW_CONTROLLED_FIELDS,
        }
    }
}

/// A legacy response line: whatever the DUT drove on the read data bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyResponse {
    pub read_data: BusValue,
}

/// A response line that includes the FIFO's flow-control flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowControlledResponse {
    /// write clock tick counter; `None` if the testbench printed something non-numeric
    pub write_clock_tick: Option<u64>,
    /// active-low reset
    pub reset_n: Logic,
    pub write_enable: Logic,
    pub read_enable: Logic,
    pub write_full: Logic,
    pub read_empty: Logic,
    pub read_data: BusValue,
}

impl FlowControlledResponse {
    /// A read was requested and the FIFO had data, so `read_data` is defined
    pub fn is_valid_read(&self) -> bool {
        self.read_enable.is_high() && self.read_empty.is_low()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseRecord {
    Legacy(LegacyResponse),
    FlowControlled(FlowControlledResponse),
}

impl ResponseRecord {
    fn from_fields(format: ResponseFormat, fields: &[&str]) -> Self {
        match format {
            ResponseFormat::Legacy => ResponseRecord::Legacy(LegacyResponse {
                read_data: BusValue::parse(fields[0]),
            }),
            ResponseFormat::FlowControlled => {
                ResponseRecord::FlowControlled(FlowControlledResponse {
                    write_clock_tick: fields[0].parse().ok(),
                    reset_n: Logic::parse(fields[1]),
                    write_enable: Logic::parse(fields[2]),
                    read_enable: Logic::parse(fields[3]),
                    write_full: Logic::parse(fields[4]),
                    read_empty: Logic::parse(fields[5]),
                    read_data: BusValue::parse(fields[6]),
                })
            }
        }
    }

    /// The output value this cycle contributes to the comparison, if any
    pub fn captured(&self) -> Option<&BusValue> {
        match self {
            ResponseRecord::Legacy(r) => Some(&r.read_data),
            ResponseRecord::FlowControlled(r) if r.is_valid_read() => Some(&r.read_data),
            ResponseRecord::FlowControlled(_) => None,
        }
    }
}

/// Parses a response trace in the given `format`
pub fn parse_responses(input: &str, format: ResponseFormat) -> Trace<ResponseRecord> {
    split_records(input, format.min_fields(), |fields| {
        ResponseRecord::from_fields(format, fields)
    })
}

/// An output value observed in a response trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub value: BusValue,
    /// 1-based line number in the response trace
    pub line: usize,
    pub span: (usize, usize),
}

/// Extracts the ordered list of observed outputs from a response trace
pub fn captured_outputs(trace: &Trace<ResponseRecord>) -> Vec<CapturedOutput> {
    trace
        .lines
        .iter()
        .filter_map(|TraceLine { line, span, record }| {
            record.captured().map(|value| CapturedOutput {
                value: value.clone(),
                line: *line,
                span: *span,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(trace: &Trace<ResponseRecord>) -> Vec<String> {
        captured_outputs(trace)
            .iter()
            .map(|c| c.value.to_string())
            .collect()
    }

    #[test]
    fn test_legacy_captures_every_line() {
        let trace = parse_responses("aa\n\nXX\n00 trailing\n", ResponseFormat::Legacy);
        assert_eq!(values(&trace), vec!["AA", "XX", "00"]);
        assert!(trace.malformed.is_empty());
    }

    #[test]
    fn test_flow_controlled_captures_valid_reads_only() {
        let input = "\
0 1 1 0 0 1 XX
1 1 0 1 0 1 XX
2 1 1 0 0 0 xx
3 1 0 1 0 0 aa
4 1 1 1 0 0 BB
5 1 0 1 0 x CC
";
        let trace = parse_responses(input, ResponseFormat::FlowControlled);
        assert_eq!(trace.len(), 6);
        assert_eq!(values(&trace), vec!["AA", "BB"]);

        let captured = captured_outputs(&trace);
        assert_eq!(captured[0].line, 4);
        assert_eq!(captured[1].line, 5);
    }

    #[test]
    fn test_flow_controlled_skips_short_lines() {
        let input = "0 1 0 1 0 0 11\n1 1 0 1 0\n2 1 0 1 0 0 22\n";
        let trace = parse_responses(input, ResponseFormat::FlowControlled);
        assert_eq!(values(&trace), vec!["11", "22"]);
        assert_eq!(trace.malformed.len(), 1);
        assert_eq!(trace.malformed[0].line, 2);
    }

    #[test]
    fn test_flow_controlled_fields() {
        let trace = parse_responses("17 0 1 0 1 0 3c\n", ResponseFormat::FlowControlled);
        let ResponseRecord::FlowControlled(r) = &trace.lines[0].record else {
            panic!("expected a flow-controlled record");
        };
        assert_eq!(r.write_clock_tick, Some(17));
        assert_eq!(r.reset_n, Logic::Low);
        assert_eq!(r.write_full, Logic::High);
        assert_eq!(r.read_data, BusValue::Known(0x3C));
        assert!(!r.is_valid_read());
    }
}
