//! Per-connection outbound handle.
//!
//! Every connection owns one bounded queue that only its own task drains and
//! writes to the socket. Everyone else (broadcasts, ban notices) holds a
//! cloned [`Outbound`] and enqueues without waiting.

use std::fmt;
use std::sync::Arc;

use parlor_proto::Reply;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Relay-unique connection identifier.
pub type ConnId = u64;

/// Outcome of a non-blocking enqueue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Queued for the connection's writer.
    Queued,
    /// The queue is full; this reply was dropped for this recipient only.
    Dropped,
    /// The connection is gone.
    Closed,
}

/// Cloneable sending side of a connection.
#[derive(Clone)]
pub struct Outbound {
    id: ConnId,
    tx: mpsc::Sender<Arc<Reply>>,
    closer: CancellationToken,
}

impl Outbound {
    /// Create the handle and the receiving end for the connection task.
    ///
    /// `closer` is cancelled to evict the connection; the connection task
    /// watches it.
    pub fn channel(
        id: ConnId,
        capacity: usize,
        closer: CancellationToken,
    ) -> (Self, mpsc::Receiver<Arc<Reply>>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { id, tx, closer }, rx)
    }

    #[inline]
    pub fn id(&self) -> ConnId {
        self.id
    }

    /// Enqueue without waiting.
    pub fn deliver(&self, reply: Arc<Reply>) -> Delivery {
        match self.tx.try_send(reply) {
            Ok(()) => Delivery::Queued,
            Err(mpsc::error::TrySendError::Full(_)) => Delivery::Dropped,
            Err(mpsc::error::TrySendError::Closed(_)) => Delivery::Closed,
        }
    }

    /// Ask the owning task to close the connection. Idempotent.
    pub fn close(&self) {
        self.closer.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.closer.is_cancelled() || self.tx.is_closed()
    }
}

impl fmt::Debug for Outbound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outbound")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}
