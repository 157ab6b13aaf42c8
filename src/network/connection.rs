//! Per-connection task.
//!
//! One `Connection` owns one socket for its whole life. It is the only
//! writer of that socket: direct answers from handlers and replies queued
//! by other connections are written from this task, each batch under the
//! configured write deadline.
//!
//! The task ends on EOF, transport failure, `disconnect`, eviction (ban) or
//! relay shutdown. Whatever the cause, teardown releases the registry entry
//! before the socket is closed.

use std::borrow::Borrow;
use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use parlor_proto::{Command, ProtocolError, Reply, ServerCodec};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::Framed;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{ConnectionError, HandlerError};
use crate::handlers::{self, Context};
use crate::state::{ConnId, Hub, Outbound, Phase};

/// Why the serve loop stopped.
#[derive(Debug)]
enum Exit {
    /// Client sent `disconnect`.
    Quit,
    /// Client closed its side.
    Eof,
    /// Evicted by another connection.
    Evicted,
    /// Relay is shutting down.
    Shutdown,
    Failed(ConnectionError),
}

impl Exit {
    /// Whether other users should be told this user left.
    fn announces_departure(&self) -> bool {
        matches!(self, Exit::Eof | Exit::Failed(_))
    }
}

enum Event {
    Closed,
    Queued(Arc<Reply>),
    Frame(Option<Result<Command, ProtocolError>>),
}

/// A single client connection.
pub struct Connection {
    id: ConnId,
    peer: SocketAddr,
    hub: Arc<Hub>,
    framed: Framed<TcpStream, ServerCodec>,
    outbound: Outbound,
    queue: mpsc::Receiver<Arc<Reply>>,
    closer: CancellationToken,
    phase: Phase,
}

impl Connection {
    /// Wrap an accepted socket. The connection's close token is a child of
    /// the relay's shutdown token.
    pub fn new(id: ConnId, stream: TcpStream, peer: SocketAddr, hub: Arc<Hub>) -> Self {
        let closer = hub.shutdown.child_token();
        let (outbound, queue) = Outbound::channel(id, hub.limits.send_queue, closer.clone());
        let framed = Framed::new(stream, ServerCodec::with_max_len(hub.limits.max_line_len));
        Self {
            id,
            peer,
            hub,
            framed,
            outbound,
            queue,
            closer,
            phase: Phase::Unregistered,
        }
    }

    /// Serve the connection until it ends, then tear it down.
    pub async fn run(mut self) {
        info!("client connected");
        let exit = self.serve().await;

        match &exit {
            Exit::Failed(err) if err.is_peer_gone() => debug!(error = %err, "peer went away"),
            Exit::Failed(err) => warn!(error = %err, "connection failed"),
            other => debug!(reason = ?other, "connection ending"),
        }

        let previous = self.phase.close();
        let was = previous.label();
        handlers::depart(&self.hub, self.id, previous, exit.announces_departure());

        let deadline = self.hub.limits.write_timeout();
        let _ = tokio::time::timeout(deadline, SinkExt::<&Reply>::close(&mut self.framed)).await;
        info!(peer = %self.peer, phase = was, "client disconnected");
    }

    async fn serve(&mut self) -> Exit {
        loop {
            let event = tokio::select! {
                biased;
                _ = self.closer.cancelled() => Event::Closed,
                Some(reply) = self.queue.recv() => Event::Queued(reply),
                frame = self.framed.next() => Event::Frame(frame),
            };

            match event {
                Event::Closed => return self.on_closed().await,
                Event::Queued(reply) => {
                    if let Err(err) = self.write(std::slice::from_ref(&reply)).await {
                        return Exit::Failed(err);
                    }
                }
                Event::Frame(None) => return Exit::Eof,
                Event::Frame(Some(Err(err))) => return self.on_protocol_error(err).await,
                Event::Frame(Some(Ok(command))) => {
                    if let Some(exit) = self.on_command(command).await {
                        return exit;
                    }
                }
            }
        }
    }

    async fn on_command(&mut self, command: Command) -> Option<Exit> {
        let mut replies = Vec::new();
        let mut ctx = Context {
            hub: &self.hub,
            outbound: &self.outbound,
            phase: &mut self.phase,
            replies: &mut replies,
        };

        let mut exit = None;
        if let Err(err) = handlers::dispatch(&mut ctx, &command) {
            match err {
                HandlerError::Quit => exit = Some(Exit::Quit),
                // The close token is already cancelled; the next loop turn
                // flushes the eviction notice.
                HandlerError::Evicted => {}
                err => {
                    debug!(command = command.name(), code = err.error_code(), "command rejected");
                    replies.extend(err.to_reply(command.name()));
                }
            }
        }

        if let Err(err) = self.write(&replies).await {
            return Some(Exit::Failed(err));
        }
        exit
    }

    /// The close token fired: either the relay is stopping or this
    /// connection was evicted. An evicted connection first writes whatever
    /// was queued for it, which includes the eviction notice.
    async fn on_closed(&mut self) -> Exit {
        if self.hub.shutdown.is_cancelled() {
            return Exit::Shutdown;
        }
        let mut pending = Vec::new();
        while let Ok(reply) = self.queue.try_recv() {
            pending.push(reply);
        }
        match self.write(&pending).await {
            Ok(()) => Exit::Evicted,
            Err(err) => Exit::Failed(err),
        }
    }

    /// Oversized or undecodable input ends the connection with an
    /// explanation, when the socket still accepts one.
    async fn on_protocol_error(&mut self, err: ProtocolError) -> Exit {
        let reason = match &err {
            ProtocolError::LineTooLong { limit, .. } => {
                Some(format!("Line too long (limit {limit} bytes)"))
            }
            ProtocolError::InvalidUtf8 { .. } => Some("Input is not valid UTF-8".to_string()),
            _ => None,
        };
        if let Some(reason) = reason {
            let _ = self.write(&[Reply::error(reason)]).await;
        }
        Exit::Failed(err.into())
    }

    async fn write<R>(&mut self, replies: &[R]) -> Result<(), ConnectionError>
    where
        R: Borrow<Reply> + Sync,
    {
        let deadline = self.hub.limits.write_timeout();
        let framed = &mut self.framed;
        let flush = async move {
            for reply in replies {
                framed.feed(Borrow::<Reply>::borrow(reply)).await?;
            }
            SinkExt::<&Reply>::flush(framed).await?;
            Ok::<(), ProtocolError>(())
        };
        match tokio::time::timeout(deadline, flush).await {
            Ok(result) => result.map_err(ConnectionError::from),
            Err(_) => {
                warn!(timeout = ?deadline, "write deadline exceeded");
                Err(ConnectionError::WriteTimeout(deadline))
            }
        }
    }
}
