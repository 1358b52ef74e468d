// Copyright 2026 Cornell University
// released under MIT License

//! # Line-oriented traces
//! Both the stimulus and the response traces are plain text files with one
//! clock cycle per line and whitespace-separated fields. This module splits
//! such a file into records while remembering where each record came from,
//! so that diagnostics can point back at the offending line.

use crate::errors::MalformedRecordError;
use log::debug;
use std::path::Path;

/// One parsed record together with its location in the trace text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceLine<T> {
    /// 1-based line number
    pub line: usize,
    /// byte range of the line (without the line terminator)
    pub span: (usize, usize),
    pub record: T,
}

/// The records of a trace, in file order, plus the lines that were skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace<T> {
    pub lines: Vec<TraceLine<T>>,
    pub malformed: Vec<MalformedRecordError>,
}

impl<T> Default for Trace<T> {
    fn default() -> Self {
        Self {
            lines: vec![],
            malformed: vec![],
        }
    }
}

impl<T> Trace<T> {
    pub fn records(&self) -> impl Iterator<Item = &T> + '_ {
        self.lines.iter().map(|l| &l.record)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl<T> FromIterator<T> for Trace<T> {
    /// Builds a trace from in-memory records; line numbers are synthesized
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let lines = iter
            .into_iter()
            .enumerate()
            .map(|(ii, record)| TraceLine {
                line: ii + 1,
                span: (0, 0),
                record,
            })
            .collect();
        Self {
            lines,
            malformed: vec![],
        }
    }
}

/// Splits `input` into records. Blank lines are ignored. Lines with fewer
/// than `min_fields` fields are recorded as malformed and skipped; extra
/// trailing fields are passed on to `build`, which may ignore them.
pub fn split_records<T>(
    input: &str,
    min_fields: usize,
    mut build: impl FnMut(&[&str]) -> T,
) -> Trace<T> {
    let mut trace = Trace::default();
    let mut offset = 0;
    for (ii, raw) in input.split_inclusive('\n').enumerate() {
        let start = offset;
        offset += raw.len();
        let text = raw.trim_end_matches(['\n', '\r']);
        let span = (start, start + text.len());
        let fields: Vec<&str> = text.split_whitespace().collect();

        if fields.is_empty() {
            continue;
        }
        if fields.len() < min_fields {
            let err = MalformedRecordError {
                line: ii + 1,
                span,
                expected: min_fields,
                found: fields.len(),
            };
            debug!("skipping malformed record: {}", err);
            trace.malformed.push(err);
            continue;
        }
        trace.lines.push(TraceLine {
            line: ii + 1,
            span,
            record: build(&fields),
        });
    }
    trace
}

/// Reads a whole trace file into memory
pub fn read_trace_file(path: impl AsRef<Path>) -> std::io::Result<String> {
    std::fs::read_to_string(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_fields(fields: &[&str]) -> usize {
        fields.len()
    }

    #[test]
    fn test_split_skips_blank_and_short_lines() {
        let input = "0 1 0 AA\n\n0 1\n   \n1 0 0 00 extra\n";
        let trace = split_records(input, 4, count_fields);

        assert_eq!(trace.len(), 2);
        assert_eq!(trace.lines[0].line, 1);
        assert_eq!(trace.lines[0].record, 4);
        assert_eq!(trace.lines[1].line, 5);
        assert_eq!(trace.lines[1].record, 5);

        assert_eq!(trace.malformed.len(), 1);
        assert_eq!(trace.malformed[0].line, 3);
        assert_eq!(trace.malformed[0].found, 2);
        assert_eq!(trace.malformed[0].expected, 4);
    }

    #[test]
    fn test_split_spans() {
        let input = "ab\r\ncd ef\nlast";
        let trace = split_records(input, 1, |f| f.join(" "));
        let spans: Vec<_> = trace.lines.iter().map(|l| l.span).collect();
        assert_eq!(spans, vec![(0, 2), (4, 9), (10, 14)]);
        assert_eq!(&input[4..9], "cd ef");
        assert_eq!(trace.lines[2].record, "last");
    }

    #[test]
    fn test_empty_input() {
        let trace = split_records("", 1, count_fields);
        assert!(trace.is_empty());
        assert!(trace.malformed.is_empty());
    }
}
