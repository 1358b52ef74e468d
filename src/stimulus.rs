// Copyright 2026 Cornell University
// released under MIT License

//! # Stimulus generation
//! Builds per-cycle stimulus for the FIFO testbench. Each scenario targets one
//! of the corner cases of a bounded queue and is written out as a stimulus
//! trace that the simulated testbench replays cycle by cycle.

use crate::signal::{BusValue, Logic};
use crate::trace::{split_records, Trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::io::Write;

/// Number of read attempts issued against an empty FIFO
pub const EMPTY_READ_ATTEMPTS: usize = 50;
/// Number of write attempts issued against a full FIFO
pub const FULL_WRITE_ATTEMPTS: usize = 50;
/// Number of cycles with read and write enabled at the same time
pub const BURST_CYCLES: usize = 100;

/// Number of fields in a stimulus line: `reset write_enable read_enable data`
pub const STIMULUS_FIELDS: usize = 4;

/// Inputs applied to the FIFO in one clock cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StimulusRecord {
    /// synchronous reset
    pub reset: bool,
    pub write_enable: bool,
    pub read_enable: bool,
    /// value on the write data bus (only meaningful when `write_enable` is set)
    pub data: BusValue,
}

impl StimulusRecord {
    pub fn reset() -> Self {
        Self::cycle(true, false, false, 0)
    }

    pub fn idle() -> Self {
        Self::cycle(false, false, false, 0)
    }

    pub fn write(data: u8) -> Self {
        Self::cycle(false, true, false, data)
    }

    pub fn read() -> Self {
        Self::cycle(false, false, true, 0)
    }

    pub fn write_read(data: u8) -> Self {
        Self::cycle(false, true, true, data)
    }

    fn cycle(reset: bool, write_enable: bool, read_enable: bool, data: u8) -> Self {
        Self {
            reset,
            write_enable,
            read_enable,
            data: BusValue::Known(data),
        }
    }

    /// Builds a record from the fields of a stimulus line.
    /// A control field counts as asserted only if it is exactly `1`.
    fn from_fields(fields: &[&str]) -> Self {
        Self {
            reset: Logic::parse(fields[0]).is_high(),
            write_enable: Logic::parse(fields[1]).is_high(),
            read_enable: Logic::parse(fields[2]).is_high(),
            data: BusValue::parse(fields[3]),
        }
    }
}

/// Serializes a record as one stimulus line (without the newline),
/// e.g. `0 1 0 AA`
impl fmt::Display for StimulusRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            Logic::from(self.reset),
            Logic::from(self.write_enable),
            Logic::from(self.read_enable),
            self.data
        )
    }
}

/// The verification scenarios we know how to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Scenario {
    /// Read-while-empty: reads from an empty FIFO must have no effect
    EmptyStress,
    /// Write-while-full: writes to a full FIFO must be dropped
    FullStress,
    /// Concurrent read and write on every cycle at half occupancy
    SimultaneousBurst,
}

impl Scenario {
    pub fn generate(self, generator: &mut StimulusGenerator) -> Vec<StimulusRecord> {
        let mut out = vec![];
        match self {
            Scenario::EmptyStress => generator.empty_stress(&mut out),
            Scenario::FullStress => generator.full_stress(&mut out),
            Scenario::SimultaneousBurst => generator.simultaneous_burst(&mut out),
        }
        out
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scenario::EmptyStress => "empty-stress",
            Scenario::FullStress => "full-stress",
            Scenario::SimultaneousBurst => "simultaneous-burst",
        };
        write!(f, "{}", name)
    }
}

/// Generates stimulus for a FIFO of a given `depth`.
/// Only the burst payload is random; everything else is deterministic.
#[derive(Debug)]
pub struct StimulusGenerator {
    depth: usize,
    rng: StdRng,
}

impl StimulusGenerator {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a generator whose random payloads are reproducible
    pub fn with_seed(depth: usize, seed: u64) -> Self {
        Self {
            depth,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Reset, then leave the FIFO idle for one cycle
    fn reset_sequence(out: &mut impl Extend<StimulusRecord>) {
        out.extend([StimulusRecord::reset(), StimulusRecord::idle()]);
    }

    /// Writes `0, 1, 2, ...` (modulo 256) for `count` cycles
    fn sequential_fill(out: &mut impl Extend<StimulusRecord>, count: usize) {
        out.extend((0..count).map(|ii| StimulusRecord::write(ii as u8)));
    }

    /// Issues reads against an empty FIFO, then writes and reads back a single
    /// value to check that the FIFO recovered. The depth is not used.
    pub fn empty_stress(&mut self, out: &mut impl Extend<StimulusRecord>) {
        Self::reset_sequence(out);
        out.extend((0..EMPTY_READ_ATTEMPTS).map(|_| StimulusRecord::read()));
        out.extend([StimulusRecord::write(0xAA), StimulusRecord::read()]);
    }

    /// Fills the FIFO with sequential values, keeps writing `FF` while it is
    /// full and finally drains it with one read per entry.
    pub fn full_stress(&mut self, out: &mut impl Extend<StimulusRecord>) {
        Self::reset_sequence(out);
        Self::sequential_fill(out, self.depth);
        out.extend((0..FULL_WRITE_ATTEMPTS).map(|_| StimulusRecord::write(0xFF)));
        out.extend((0..self.depth).map(|_| StimulusRecord::read()));
    }

    /// Fills the FIFO halfway, then reads and writes a random byte on every
    /// cycle, which keeps the occupancy constant.
    pub fn simultaneous_burst(&mut self, out: &mut impl Extend<StimulusRecord>) {
        Self::reset_sequence(out);
        Self::sequential_fill(out, self.depth / 2);
        for _ in 0..BURST_CYCLES {
            let payload: u8 = self.rng.gen();
            out.extend([StimulusRecord::write_read(payload)]);
        }
    }
}

/// Writes `records` as a stimulus trace, one line per cycle
pub fn write_stimulus<'a>(
    sink: &mut impl Write,
    records: impl IntoIterator<Item = &'a StimulusRecord>,
) -> std::io::Result<()> {
    for record in records {
        writeln!(sink, "{}", record)?;
    }
    Ok(())
}

/// Parses a stimulus trace. Lines with fewer than four fields are skipped.
pub fn parse_stimulus(input: &str) -> Trace<StimulusRecord> {
    split_records(input, STIMULUS_FIELDS, StimulusRecord::from_fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::Settings;
    use std::path::Path;

    fn snap(name: &str, content: String) {
        let mut settings = Settings::clone_current();
        settings.set_snapshot_path(Path::new("../tests/snapshots"));
        settings.set_prepend_module_to_snapshot(false);
        settings.bind(|| {
            insta::assert_snapshot!(name, content);
        });
    }

    fn to_text(records: &[StimulusRecord]) -> String {
        let mut buf = vec![];
        write_stimulus(&mut buf, records).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_record_line_format() {
        assert_eq!(StimulusRecord::write(0xAA).to_string(), "0 1 0 AA");
        assert_eq!(StimulusRecord::reset().to_string(), "1 0 0 00");
        assert_eq!(StimulusRecord::write_read(0x0F).to_string(), "0 1 1 0F");
    }

    #[test]
    fn test_empty_stress() {
        let mut generator = StimulusGenerator::new(32);
        let records = Scenario::EmptyStress.generate(&mut generator);
        assert_eq!(records.len(), 2 + EMPTY_READ_ATTEMPTS + 2);
        snap("empty_stress", to_text(&records));
    }

    #[test]
    fn test_empty_stress_ignores_depth() {
        let small = Scenario::EmptyStress.generate(&mut StimulusGenerator::new(4));
        let large = Scenario::EmptyStress.generate(&mut StimulusGenerator::new(1024));
        assert_eq!(small, large);
    }

    #[test]
    fn test_full_stress() {
        let depth = 32;
        let records = Scenario::FullStress.generate(&mut StimulusGenerator::new(depth));
        assert_eq!(records.len(), 2 + depth + FULL_WRITE_ATTEMPTS + depth);

        let fill = &records[2..2 + depth];
        for (ii, record) in fill.iter().enumerate() {
            assert_eq!(*record, StimulusRecord::write(ii as u8));
        }
        let overflow = &records[2 + depth..2 + depth + FULL_WRITE_ATTEMPTS];
        assert!(overflow.iter().all(|r| *r == StimulusRecord::write(0xFF)));
        let drain = &records[2 + depth + FULL_WRITE_ATTEMPTS..];
        assert!(drain.iter().all(|r| *r == StimulusRecord::read()));
    }

    #[test]
    fn test_full_stress_wraps_fill_values() {
        let records = Scenario::FullStress.generate(&mut StimulusGenerator::new(300));
        assert_eq!(records[2 + 256], StimulusRecord::write(0));
        assert_eq!(records[2 + 299], StimulusRecord::write(43));
    }

    #[test]
    fn test_simultaneous_burst() {
        let depth = 32;
        let records =
            Scenario::SimultaneousBurst.generate(&mut StimulusGenerator::with_seed(depth, 7));
        assert_eq!(records.len(), 2 + depth / 2 + BURST_CYCLES);
        assert_eq!(records[0], StimulusRecord::reset());
        assert_eq!(records[1], StimulusRecord::idle());
        assert_eq!(records[2 + 15], StimulusRecord::write(15));

        let burst = &records[2 + depth / 2..];
        assert!(burst
            .iter()
            .all(|r| !r.reset && r.write_enable && r.read_enable));
    }

    #[test]
    fn test_burst_seed_is_reproducible() {
        let a = Scenario::SimultaneousBurst.generate(&mut StimulusGenerator::with_seed(32, 42));
        let b = Scenario::SimultaneousBurst.generate(&mut StimulusGenerator::with_seed(32, 42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_generated_text_parses_back() {
        let records = Scenario::FullStress.generate(&mut StimulusGenerator::new(8));
        let trace = parse_stimulus(&to_text(&records));
        assert!(trace.malformed.is_empty());
        assert_eq!(trace.records().cloned().collect::<Vec<_>>(), records);
    }

    #[test]
    fn test_parse_stimulus_lenient_fields() {
        let trace = parse_stimulus("0 1 0 aa\n0 x 1 xx\n0 1\n");
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.lines[0].record, StimulusRecord::write(0xAA));
        // `x` is not an asserted write enable, the read still counts
        assert_eq!(
            trace.lines[1].record,
            StimulusRecord {
                reset: false,
                write_enable: false,
                read_enable: true,
                data: BusValue::Unknown("XX".to_string()),
            }
        );
        assert_eq!(trace.malformed.len(), 1);
    }
}
