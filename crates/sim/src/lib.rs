//! Mainline simulation library.
//!
//! Simulates many concurrently-arriving trains competing for one shared
//! main track:
//! - Trains load in parallel, then queue per direction and priority
//! - A single dispatcher grants the track to one train at a time
//! - Selection is deterministic over captured ready timestamps
//! - Direction balancing caps same-direction runs at two crossings

pub mod clock;
pub mod dispatcher;
pub mod log;
pub mod queue;
pub mod roster;
pub mod scheduler;
pub mod train;
pub mod worker;

pub use clock::SimClock;
pub use dispatcher::{Dispatcher, Grant, GrantReceiver, GrantSender};
pub use log::EventLog;
pub use queue::{ReadyEntry, ReadyQueue};
pub use roster::{load, load_path, RosterError};
pub use scheduler::SchedulerCore;
pub use train::{Direction, Priority, TrainSpec};
pub use worker::{SimConfig, Simulation, SpawnError};
