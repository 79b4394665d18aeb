//! End-to-end scheduling tests: full simulations over real threads,
//! observed through the event log.
//!
//! Scenarios stagger loading times by multiple time units so that ready
//! order is stable against scheduler jitter; assertions about dispatch
//! order only compare events separated by at least two units.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use mainline_sim::log::EventLog;
use mainline_sim::train::{Direction, Priority, TrainSpec};
use mainline_sim::worker::{SimConfig, Simulation};

/// Writer that appends into a shared buffer the test can read back.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn train(
    id: u32,
    direction: Direction,
    priority: Priority,
    loading_time: u32,
    crossing_time: u32,
) -> TrainSpec {
    TrainSpec {
        id,
        direction,
        priority,
        loading_time,
        crossing_time,
    }
}

/// Run a roster with a shrunken time unit, returning the captured log.
fn run_captured(roster: &[TrainSpec], unit_ms: u64) -> String {
    let buf = SharedBuf::default();
    let log = EventLog::new(Box::new(buf.clone()));
    let config = SimConfig {
        time_unit: Duration::from_millis(unit_ms),
    };
    Simulation::new(config, log)
        .run(roster)
        .expect("simulation run failed");
    buf.contents()
}

/// Parsed event: `(kind, id, direction)` where kind is "ready", "ON" or
/// "OFF".
fn parse_events(output: &str) -> Vec<(String, u32, String)> {
    output
        .lines()
        .map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            assert!(fields.len() >= 5, "short log line: {:?}", line);
            assert_eq!(fields[1], "Train", "bad log line: {:?}", line);
            let id = fields[2].parse().expect("train id");
            let kind = fields[4].to_string();
            let direction = fields.last().unwrap().to_string();
            (kind, id, direction)
        })
        .collect()
}

/// Ids in the order they entered the track.
fn dispatch_order(output: &str) -> Vec<u32> {
    parse_events(output)
        .into_iter()
        .filter(|(kind, _, _)| kind == "ON")
        .map(|(_, id, _)| id)
        .collect()
}

#[test]
fn empty_roster_completes_immediately() {
    let output = run_captured(&[], 5);
    assert!(output.is_empty());
}

#[test]
fn every_train_logs_three_events() {
    let roster = vec![
        train(0, Direction::East, Priority::Low, 1, 1),
        train(1, Direction::West, Priority::High, 1, 1),
        train(2, Direction::East, Priority::High, 2, 1),
        train(3, Direction::West, Priority::Low, 2, 2),
        train(4, Direction::East, Priority::Low, 3, 1),
    ];
    let output = run_captured(&roster, 5);
    let events = parse_events(&output);

    assert_eq!(events.len(), roster.len() * 3);
    for spec in &roster {
        let kinds: Vec<&str> = events
            .iter()
            .filter(|(_, id, _)| *id == spec.id)
            .map(|(kind, _, _)| kind.as_str())
            .collect();
        assert_eq!(kinds, ["ready", "ON", "OFF"], "train {}", spec.id);
    }
}

#[test]
fn track_is_held_by_one_train_at_a_time() {
    // Everything becomes ready at once; whatever order the dispatcher
    // picks, ON/OFF must strictly alternate with matching ids.
    let mut roster = Vec::new();
    for id in 0..8 {
        let direction = if id % 2 == 0 {
            Direction::East
        } else {
            Direction::West
        };
        let priority = if id % 3 == 0 {
            Priority::High
        } else {
            Priority::Low
        };
        roster.push(train(id, direction, priority, 1, 2));
    }
    let output = run_captured(&roster, 5);

    let mut on_track: Option<u32> = None;
    let mut crossings = 0;
    for (kind, id, _) in parse_events(&output) {
        match kind.as_str() {
            "ON" => {
                assert_eq!(on_track, None, "train {} entered an occupied track", id);
                on_track = Some(id);
            }
            "OFF" => {
                assert_eq!(on_track, Some(id), "train {} left a track it never held", id);
                on_track = None;
                crossings += 1;
            }
            _ => {}
        }
    }
    assert_eq!(on_track, None);
    assert_eq!(crossings, roster.len());
}

#[test]
fn streak_of_two_pulls_the_opposite_direction_across() {
    // Four East trains ready from the start, one West train that becomes
    // ready during the first East crossing. After the second East
    // crossing the streak forces the West train ahead of the remaining
    // East trains.
    let roster = vec![
        train(0, Direction::East, Priority::Low, 1, 8),
        train(1, Direction::East, Priority::Low, 1, 8),
        train(2, Direction::East, Priority::Low, 1, 8),
        train(3, Direction::East, Priority::Low, 1, 8),
        train(4, Direction::West, Priority::Low, 4, 1),
    ];
    let output = run_captured(&roster, 25);

    let directions: Vec<String> = parse_events(&output)
        .into_iter()
        .filter(|(kind, _, _)| kind == "ON")
        .map(|(_, _, direction)| direction)
        .collect();
    assert_eq!(directions, ["East", "East", "West", "East", "East"]);
}

#[test]
fn high_priority_jumps_ahead_of_earlier_low() {
    // Train 1 is ready before train 2, but 2 is high priority and both
    // are waiting when the track frees up.
    let roster = vec![
        train(0, Direction::East, Priority::Low, 1, 8),
        train(1, Direction::East, Priority::Low, 3, 1),
        train(2, Direction::East, Priority::High, 5, 1),
    ];
    let output = run_captured(&roster, 25);
    assert_eq!(dispatch_order(&output), vec![0, 2, 1]);
}

#[test]
fn identical_rosters_dispatch_identically() {
    // Train 0 bootstraps West and holds the track while every other
    // train becomes ready, so the remaining order is a pure function of
    // the queues: high before low, earlier ready time first.
    let roster = vec![
        train(0, Direction::West, Priority::Low, 1, 12),
        train(1, Direction::East, Priority::Low, 3, 1),
        train(2, Direction::East, Priority::High, 5, 1),
        train(3, Direction::West, Priority::Low, 7, 1),
        train(4, Direction::West, Priority::High, 9, 1),
    ];

    let first = dispatch_order(&run_captured(&roster, 25));
    let second = dispatch_order(&run_captured(&roster, 25));

    assert_eq!(first, second);
    assert_eq!(first, vec![0, 2, 4, 1, 3]);
}
