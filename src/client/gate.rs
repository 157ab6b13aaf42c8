//! Rename gate.
//!
//! The input loop must not draw its next prompt while a rename is in
//! flight, or the prompt would show a name the relay has not confirmed.
//! [`RenameGate::begin`] registers a request before the command is sent;
//! the network loop answers requests in the order they were made (the relay
//! answers renames in order on one connection) and [`RenameGate::close`]
//! releases everyone when the connection ends.
//!
//! A waiter that gives up after its timeout leaves its slot in the queue as
//! abandoned. The late answer is consumed by that slot, so it can never
//! release a newer request by mistake.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;

/// How a rename request ended, from the input loop's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Relay confirmed the new name.
    Changed(String),
    /// Relay rejected the rename.
    Failed(String),
    /// Connection ended before an answer arrived.
    Closed,
    /// No answer within the wait limit.
    TimedOut,
}

/// A registered rename request.
#[derive(Debug)]
pub struct RenameTicket {
    id: u64,
    rx: oneshot::Receiver<GateOutcome>,
}

impl RenameTicket {
    pub fn id(&self) -> u64 {
        self.id
    }
}

struct Pending {
    id: u64,
    /// `None` once the waiter has given up.
    tx: Option<oneshot::Sender<GateOutcome>>,
}

#[derive(Default)]
struct GateState {
    next_id: u64,
    pending: VecDeque<Pending>,
    abandoned: u64,
    closed: bool,
}

/// One-shot completion per rename request.
#[derive(Default)]
pub struct RenameGate {
    state: Mutex<GateState>,
}

impl RenameGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a request. Call before sending `changeUsername`.
    pub fn begin(&self) -> RenameTicket {
        let (tx, rx) = oneshot::channel();
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        if state.closed {
            let _ = tx.send(GateOutcome::Closed);
        } else {
            state.pending.push_back(Pending { id, tx: Some(tx) });
        }
        RenameTicket { id, rx }
    }

    /// Deliver the relay's answer to the oldest outstanding request.
    ///
    /// Returns the id of the request that was live and released, or `None`
    /// when the answer landed on an abandoned slot or nothing was pending.
    pub fn resolve(&self, outcome: GateOutcome) -> Option<u64> {
        let pending = self.state.lock().pending.pop_front()?;
        let tx = pending.tx?;
        tx.send(outcome).ok().map(|()| pending.id)
    }

    /// Wait for `ticket` to be answered, for at most `limit`.
    pub async fn wait(&self, ticket: RenameTicket, limit: Duration) -> GateOutcome {
        let RenameTicket { id, rx } = ticket;
        match tokio::time::timeout(limit, rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => GateOutcome::Closed,
            Err(_) => {
                self.abandon(id);
                GateOutcome::TimedOut
            }
        }
    }

    fn abandon(&self, id: u64) {
        let mut state = self.state.lock();
        if let Some(pending) = state.pending.iter_mut().find(|p| p.id == id) {
            pending.tx = None;
            state.abandoned += 1;
        }
    }

    /// Release every waiter with [`GateOutcome::Closed`]; later requests
    /// resolve immediately. Idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        for pending in state.pending.drain(..) {
            if let Some(tx) = pending.tx {
                let _ = tx.send(GateOutcome::Closed);
            }
        }
    }

    /// Requests that timed out so far.
    pub fn abandoned(&self) -> u64 {
        self.state.lock().abandoned
    }
}
