// Copyright 2026 Cornell University
// released under MIT License

//! # Golden FIFO model
//! Reference model of the FIFO under test. Writes to a full FIFO are dropped
//! and reads from an empty FIFO return nothing. Neither is an error: the
//! hardware must behave the same way.

use crate::signal::BusValue;
use crate::stimulus::StimulusRecord;
use std::collections::VecDeque;

/// A bounded first-in-first-out queue of bus values
#[derive(Debug, Clone)]
pub struct GoldenFifo {
    entries: VecDeque<BusValue>,
    depth: usize,
}

impl GoldenFifo {
    pub fn new(depth: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(depth),
            depth,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.depth
    }

    /// Discards all entries
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Appends `value` at the tail. Returns `false` (and drops the value)
    /// if the FIFO is full.
    pub fn push(&mut self, value: BusValue) -> bool {
        if self.is_full() {
            return false;
        }
        self.entries.push_back(value);
        true
    }

    /// Removes the head entry; `None` if the FIFO is empty
    pub fn pop(&mut self) -> Option<BusValue> {
        self.entries.pop_front()
    }

    /// Applies one stimulus cycle and returns the value read, if any.
    ///
    /// The write is evaluated before the read, so with both enabled a value
    /// written into an empty FIFO is read back in the same cycle, and a full
    /// FIFO drops the write but still pops its head.
    pub fn step(&mut self, stim: &StimulusRecord) -> Option<BusValue> {
        if stim.reset {
            self.reset();
            return None;
        }
        if stim.write_enable {
            self.push(stim.data.clone());
        }
        if stim.read_enable {
            self.pop()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_order() {
        let mut fifo = GoldenFifo::new(4);
        for v in [1u8, 2, 3] {
            assert!(fifo.push(v.into()));
        }
        assert_eq!(fifo.pop(), Some(BusValue::Known(1)));
        assert_eq!(fifo.pop(), Some(BusValue::Known(2)));
        assert_eq!(fifo.pop(), Some(BusValue::Known(3)));
        assert_eq!(fifo.pop(), None);
    }

    #[test]
    fn test_drop_on_full() {
        let mut fifo = GoldenFifo::new(2);
        assert!(fifo.push(0xAu8.into()));
        assert!(fifo.push(0xBu8.into()));
        assert!(fifo.is_full());
        assert!(!fifo.push(0xCu8.into()));
        assert_eq!(fifo.len(), 2);
        assert_eq!(fifo.pop(), Some(BusValue::Known(0xA)));
    }

    #[test]
    fn test_zero_depth_never_accepts() {
        let mut fifo = GoldenFifo::new(0);
        assert!(fifo.is_full());
        assert!(!fifo.push(0u8.into()));
        assert!(fifo.is_empty());
    }

    #[test]
    fn test_step_reset_wins() {
        let mut fifo = GoldenFifo::new(4);
        assert_eq!(fifo.step(&StimulusRecord::write(0x11)), None);
        let reset_with_enables = StimulusRecord {
            reset: true,
            write_enable: true,
            read_enable: true,
            data: BusValue::Known(0x22),
        };
        assert_eq!(fifo.step(&reset_with_enables), None);
        assert!(fifo.is_empty());
    }

    #[test]
    fn test_step_simultaneous_read_write() {
        let mut fifo = GoldenFifo::new(2);
        // empty: the written value falls straight through
        assert_eq!(
            fifo.step(&StimulusRecord::write_read(0x33)),
            Some(BusValue::Known(0x33))
        );
        assert!(fifo.is_empty());

        fifo.step(&StimulusRecord::write(0x01));
        fifo.step(&StimulusRecord::write(0x02));
        // full: write dropped, head still popped
        assert_eq!(
            fifo.step(&StimulusRecord::write_read(0x03)),
            Some(BusValue::Known(0x01))
        );
        assert_eq!(fifo.len(), 1);
    }
}
