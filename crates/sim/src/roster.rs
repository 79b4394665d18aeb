//! Roster loading: parse and validate the train input file.
//!
//! One train per line: a direction code followed by loading and crossing
//! times. `E`/`W` are high-priority East/West, `e`/`w` low-priority.
//! Durations must lie in 1..=99. Blank lines are skipped; the first bad
//! line aborts the whole load, so the scheduling core never sees a
//! partially valid roster.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::train::{Direction, Priority, TrainSpec};

/// Durations accepted for loading and crossing times, in time units.
pub const DURATION_RANGE: std::ops::RangeInclusive<i64> = 1..=99;

/// Why a roster failed to load. Fatal; raised before any thread starts.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("cannot read roster: {0}")]
    Io(#[from] io::Error),

    #[error("line {line_no}: malformed train entry {line:?}")]
    Malformed { line_no: usize, line: String },

    #[error("line {line_no}: duration {value} outside {min}..={max}", min = DURATION_RANGE.start(), max = DURATION_RANGE.end())]
    DurationOutOfRange { line_no: usize, value: i64 },

    #[error("line {line_no}: unknown direction code {code:?}")]
    UnknownDirection { line_no: usize, code: char },
}

/// Load a roster from a file on disk.
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Vec<TrainSpec>, RosterError> {
    load(BufReader::new(File::open(path)?))
}

/// Load a roster from any buffered reader.
///
/// Ids are assigned in input order starting at 0, counting only train
/// lines. An empty (or all-blank) input yields an empty roster, which is
/// a valid, trivially complete simulation.
pub fn load<R: BufRead>(reader: R) -> Result<Vec<TrainSpec>, RosterError> {
    let mut trains = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let id = trains.len() as u32;
        trains.push(parse_line(index + 1, &line, id)?);
    }
    Ok(trains)
}

fn malformed(line_no: usize, line: &str) -> RosterError {
    RosterError::Malformed {
        line_no,
        line: line.to_string(),
    }
}

fn parse_line(line_no: usize, line: &str, id: u32) -> Result<TrainSpec, RosterError> {
    let mut fields = line.split_whitespace();
    let (code, loading, crossing) = match (fields.next(), fields.next(), fields.next(), fields.next())
    {
        (Some(code), Some(loading), Some(crossing), None) => (code, loading, crossing),
        _ => return Err(malformed(line_no, line)),
    };

    let mut chars = code.chars();
    let code = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => return Err(malformed(line_no, line)),
    };
    let (direction, priority) = match code {
        'E' => (Direction::East, Priority::High),
        'e' => (Direction::East, Priority::Low),
        'W' => (Direction::West, Priority::High),
        'w' => (Direction::West, Priority::Low),
        other => {
            return Err(RosterError::UnknownDirection {
                line_no,
                code: other,
            })
        }
    };

    let loading_time = parse_duration(line_no, line, loading)?;
    let crossing_time = parse_duration(line_no, line, crossing)?;

    Ok(TrainSpec {
        id,
        direction,
        priority,
        loading_time,
        crossing_time,
    })
}

fn parse_duration(line_no: usize, line: &str, field: &str) -> Result<u32, RosterError> {
    let value: i64 = field.parse().map_err(|_| malformed(line_no, line))?;
    if !DURATION_RANGE.contains(&value) {
        return Err(RosterError::DurationOutOfRange { line_no, value });
    }
    Ok(value as u32)
}
