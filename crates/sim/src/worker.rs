//! Train workers and the simulation driver.
//!
//! One thread per train drives its lifecycle: load, stamp ready, enqueue,
//! wait for the grant, cross, report finished. `Simulation::run` wires
//! the threads to the shared monitor, starts the dispatcher, and joins
//! everything.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;

use crate::clock::SimClock;
use crate::dispatcher::{grant_channel, Dispatcher, GrantReceiver};
use crate::log::EventLog;
use crate::queue::ReadyEntry;
use crate::scheduler::SchedulerCore;
use crate::train::TrainSpec;

/// Simulation tuning knobs.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Real-time length of one loading/crossing unit.
    pub time_unit: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            time_unit: Duration::from_millis(100),
        }
    }
}

/// Thread creation failed for the dispatcher or a train worker.
///
/// Fatal: the caller tears the run down, but only after already-started
/// workers have been dispatched to completion and joined.
#[derive(Debug, Error)]
#[error("failed to start {role} thread: {source}")]
pub struct SpawnError {
    role: String,
    #[source]
    source: io::Error,
}

impl SpawnError {
    fn new(role: impl Into<String>, source: io::Error) -> Self {
        Self {
            role: role.into(),
            source,
        }
    }
}

/// Owns the pieces every worker shares.
pub struct Simulation {
    config: SimConfig,
    log: Arc<EventLog>,
}

impl Simulation {
    pub fn new(config: SimConfig, log: EventLog) -> Self {
        Self {
            config,
            log: Arc::new(log),
        }
    }

    /// Run the roster to completion: spawn the dispatcher and one worker
    /// per train, then join them all.
    ///
    /// If a spawn fails midway, the already-started trains still get
    /// dispatched and joined, the dispatcher is shut down, and the error
    /// is returned.
    pub fn run(&self, roster: &[TrainSpec]) -> Result<(), SpawnError> {
        let total = roster.len();
        if total == 0 {
            return Ok(());
        }

        let core = Arc::new(SchedulerCore::new());
        let clock = SimClock::start();

        let mut grant_txs = Vec::with_capacity(total);
        let mut grant_rxs = Vec::with_capacity(total);
        for _ in 0..total {
            let (tx, rx) = grant_channel();
            grant_txs.push(tx);
            grant_rxs.push(rx);
        }

        let dispatcher = Dispatcher::new(Arc::clone(&core), grant_txs);
        let dispatcher_handle = thread::Builder::new()
            .name("dispatcher".into())
            .spawn(move || dispatcher.run())
            .map_err(|e| SpawnError::new("dispatcher", e))?;

        let mut workers: Vec<JoinHandle<()>> = Vec::with_capacity(total);
        let mut spawn_failure = None;
        for (spec, grant_rx) in roster.iter().cloned().zip(grant_rxs) {
            let core = Arc::clone(&core);
            let log = Arc::clone(&self.log);
            let time_unit = self.config.time_unit;
            let name = format!("train-{}", spec.id);
            let spawned = thread::Builder::new()
                .name(name)
                .spawn(move || drive_train(spec, core, clock, log, grant_rx, time_unit));
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    spawn_failure = Some(SpawnError::new("train worker", e));
                    break;
                }
            }
        }

        // Started trains run to completion either way; the dispatcher
        // keeps granting as long as candidates appear.
        for handle in workers {
            let _ = handle.join();
        }

        match spawn_failure {
            Some(err) => {
                // Not every train ran, so the dispatcher will never see
                // trains_finished == total on its own.
                core.shutdown();
                let _ = dispatcher_handle.join();
                Err(err)
            }
            None => {
                let _ = dispatcher_handle.join();
                Ok(())
            }
        }
    }
}

/// One train's lifecycle, from loading to leaving the track.
fn drive_train(
    spec: TrainSpec,
    core: Arc<SchedulerCore>,
    clock: SimClock,
    log: Arc<EventLog>,
    grant: GrantReceiver,
    time_unit: Duration,
) {
    // Loading happens entirely outside the shared state.
    thread::sleep(time_unit * spec.loading_time);

    // The ready timestamp is stamped exactly once; every later dispatch
    // decision compares this captured value, never the current clock.
    let ready_ns = clock.elapsed_ns();
    log.train_ready(&clock, &spec);
    core.enqueue_ready(
        spec.direction,
        spec.priority,
        ReadyEntry {
            ready_ns,
            id: spec.id,
        },
    );

    // Block until the dispatcher fulfills our one-shot grant. An error
    // means the dispatcher is gone and the run is tearing down.
    if grant.recv().is_err() {
        return;
    }

    // Crossing runs with the monitor lock released; exclusivity comes
    // from the track_in_use bookkeeping in the scheduler core.
    log.train_enters(&clock, &spec);
    thread::sleep(time_unit * spec.crossing_time);
    log.train_exits(&clock, &spec);

    core.finish_crossing(spec.direction);
}
