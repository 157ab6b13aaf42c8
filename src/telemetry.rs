//! Tracing setup, command timing and standard spans.

use std::time::Instant;

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber.
///
/// `RUST_LOG` wins; otherwise `default_directive` is used. Output goes to
/// stderr so the client's terminal rendering on stdout stays clean.
pub fn init(default_directive: &str, with_target: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(with_target)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Logs how long a command took when dropped.
pub struct CommandTimer {
    command: String,
    start: Instant,
}

impl CommandTimer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        debug!(
            command = %self.command,
            elapsed_us = self.start.elapsed().as_micros() as u64,
            "command handled"
        );
    }
}

/// Standardized span constructors.
pub mod spans {
    use std::net::SocketAddr;

    use tracing::{Span, info_span};

    /// Span for one accepted relay connection.
    pub fn connection(conn: u64, peer: SocketAddr) -> Span {
        info_span!("connection", conn = conn, peer = %peer)
    }

    /// Span for the terminal client's session with a relay.
    pub fn session(server: &str) -> Span {
        info_span!("session", server = %server)
    }
}
