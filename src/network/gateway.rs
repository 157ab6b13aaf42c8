//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds the relay socket and spawns a [`Connection`] task for
//! each accepted client. Tasks are tracked so shutdown can wait for every
//! connection to finish its teardown.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{error, info, instrument, warn, Instrument};

use crate::config::Config;
use crate::network::Connection;
use crate::state::Hub;
use crate::telemetry::spans;

/// The Gateway accepts incoming TCP connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    hub: Arc<Hub>,
    tracker: TaskTracker,
}

impl Gateway {
    /// Bind the gateway to the specified address.
    pub async fn bind(addr: SocketAddr, hub: Arc<Hub>) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(address = %listener.local_addr()?, "listener bound");
        Ok(Self {
            listener,
            hub,
            tracker: TaskTracker::new(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until shutdown is requested or the listener fails.
    ///
    /// Either way every connection is closed and awaited before returning.
    /// A listener failure is returned as the error and also cancels the
    /// relay's shutdown token.
    #[instrument(skip(self), name = "gateway", fields(server = %self.hub.server_name))]
    pub async fn run(self) -> io::Result<()> {
        let result = loop {
            let accepted = tokio::select! {
                biased;
                _ = self.hub.shutdown.cancelled() => break Ok(()),
                accepted = self.listener.accept() => accepted,
            };
            match accepted {
                Ok((stream, peer)) => self.spawn(stream, peer),
                Err(err) if is_transient(&err) => {
                    warn!(error = %err, "accept failed for one connection");
                }
                Err(err) => {
                    error!(error = %err, "listener failed");
                    break Err(err);
                }
            }
        };

        self.hub.shutdown.cancel();
        drop(self.listener);
        info!("no longer accepting connections");

        self.tracker.close();
        self.tracker.wait().await;
        info!("all connections closed");
        result
    }

    fn spawn(&self, stream: tokio::net::TcpStream, peer: SocketAddr) {
        if let Err(err) = stream.set_nodelay(true) {
            warn!(%peer, error = %err, "failed to set TCP_NODELAY");
        }
        let id = self.hub.next_conn_id();
        let connection = Connection::new(id, stream, peer, Arc::clone(&self.hub));
        self.tracker
            .spawn(connection.run().instrument(spans::connection(id, peer)));
    }
}

/// Accept errors that concern a single pending connection, not the listener.
fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
    )
}

/// A running relay: the gateway task plus its shared state.
pub struct Relay {
    local_addr: SocketAddr,
    hub: Arc<Hub>,
    task: JoinHandle<io::Result<()>>,
}

impl Relay {
    /// Bind `config.listen.address` and start accepting in a background task.
    pub async fn start(config: &Config) -> io::Result<Self> {
        let hub = Arc::new(Hub::new(config));
        let gateway = Gateway::bind(config.listen.address, Arc::clone(&hub)).await?;
        let local_addr = gateway.local_addr()?;
        let task = tokio::spawn(gateway.run());
        Ok(Self {
            local_addr,
            hub,
            task,
        })
    }

    /// The bound address (useful with port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn hub(&self) -> &Arc<Hub> {
        &self.hub
    }

    /// Stop accepting, close every connection and wait for them.
    pub async fn shutdown(self) -> io::Result<()> {
        self.hub.shutdown.cancel();
        self.wait().await
    }

    /// Wait for the gateway to stop on its own (listener failure or an
    /// external cancel of the hub's shutdown token).
    pub async fn wait(self) -> io::Result<()> {
        match self.task.await {
            Ok(result) => result,
            Err(join) => Err(io::Error::other(join)),
        }
    }
}
