//! Broadcast delivery.
//!
//! Fan-out never waits on a receiver. Each target gets the reply through its
//! own bounded queue; a full queue costs that target this one reply, a
//! closed queue is skipped, and nothing a target does can stop delivery to
//! the rest.

use std::sync::Arc;

use parlor_proto::Reply;
use tracing::warn;

use crate::state::{ConnId, Delivery, Presence};

/// What happened to one broadcast.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FanoutReport {
    pub queued: usize,
    pub dropped: usize,
    pub closed: usize,
}

/// Deliver `reply` to every registered connection except `exclude`.
///
/// Recipients are taken from a point-in-time snapshot of the registry.
pub fn broadcast(presence: &Presence, reply: Reply, exclude: Option<ConnId>) -> FanoutReport {
    let reply = Arc::new(reply);
    let mut report = FanoutReport::default();

    for entry in presence.snapshot() {
        if Some(entry.conn_id()) == exclude {
            continue;
        }
        match entry.outbound.deliver(Arc::clone(&reply)) {
            Delivery::Queued => report.queued += 1,
            Delivery::Dropped => {
                report.dropped += 1;
                warn!(
                    target_conn = entry.conn_id(),
                    target = %entry.name,
                    "send queue full, dropping reply"
                );
            }
            Delivery::Closed => report.closed += 1,
        }
    }
    report
}
