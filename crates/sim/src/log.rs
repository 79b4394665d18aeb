//! Event log: timestamped lines for every train state change.
//!
//! Workers log concurrently, so every line goes through one mutex and is
//! flushed whole. The log has its own lock, separate from the scheduler
//! monitor; a train never holds both at once.

use std::io::Write;

use parking_lot::Mutex;

use crate::clock::SimClock;
use crate::train::TrainSpec;

/// Serialized sink for simulation events.
pub struct EventLog {
    out: Mutex<Box<dyn Write + Send>>,
}

impl EventLog {
    /// Wrap a writer. Lines are flushed one at a time so concurrent
    /// emissions never interleave and a crash loses at most one line.
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// A log that discards everything.
    pub fn sink() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// The train finished loading and is eligible for dispatch.
    pub fn train_ready(&self, clock: &SimClock, train: &TrainSpec) {
        self.write_line(format_args!(
            "{} Train {:2} is ready to go {:>4}",
            clock.format_elapsed(),
            train.id,
            train.direction
        ));
    }

    /// The train was granted the track and starts crossing.
    pub fn train_enters(&self, clock: &SimClock, train: &TrainSpec) {
        self.write_line(format_args!(
            "{} Train {:2} is ON the main track going {:>4}",
            clock.format_elapsed(),
            train.id,
            train.direction
        ));
    }

    /// The train finished crossing and released the track.
    pub fn train_exits(&self, clock: &SimClock, train: &TrainSpec) {
        self.write_line(format_args!(
            "{} Train {:2} is OFF the main track after going {:>4}",
            clock.format_elapsed(),
            train.id,
            train.direction
        ));
    }

    fn write_line(&self, line: std::fmt::Arguments<'_>) {
        let mut out = self.out.lock();
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }
}
