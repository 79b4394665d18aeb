//! Dispatcher: the single thread that grants the track.
//!
//! Loops on the scheduler monitor (wait for a candidate with a free
//! track, select one, claim the track, fulfill that train's grant
//! channel) until every train has finished.

use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::scheduler::SchedulerCore;

/// One-shot token telling a train it holds the track.
#[derive(Debug)]
pub struct Grant;

pub type GrantSender = Sender<Grant>;
pub type GrantReceiver = Receiver<Grant>;

/// Channel for exactly one grant. The buffer slot means a grant sent
/// before the train blocks is held for it, so a wakeup can never be
/// missed.
pub fn grant_channel() -> (GrantSender, GrantReceiver) {
    bounded(1)
}

/// The dispatch loop. Holds one grant sender per train, each fulfilled
/// at most once.
pub struct Dispatcher {
    core: Arc<SchedulerCore>,
    grants: Vec<Option<GrantSender>>,
}

impl Dispatcher {
    pub fn new(core: Arc<SchedulerCore>, grants: Vec<GrantSender>) -> Self {
        Self {
            core,
            grants: grants.into_iter().map(Some).collect(),
        }
    }

    /// Run until all trains have crossed, or until shutdown.
    ///
    /// `next_grant` blocks inside the monitor and returns with the track
    /// already claimed for the chosen train; delivering the grant is
    /// then race-free even though the lock has been released.
    pub fn run(mut self) {
        let total = self.grants.len();
        while let Some(id) = self.core.next_grant(total) {
            let grant = self.grants.get_mut(id as usize).and_then(Option::take);
            debug_assert!(grant.is_some(), "train {} granted twice", id);
            if let Some(grant) = grant {
                // A send can only fail if the train died; nothing to do
                // then but pick the next candidate.
                let _ = grant.send(Grant);
            }
        }
    }
}
