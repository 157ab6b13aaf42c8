//! Relay-wide shared state.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

use super::outbound::ConnId;
use super::palette::Palette;
use super::presence::Presence;
use crate::config::{Config, LimitsConfig};

/// Everything connection tasks share, behind one `Arc`.
#[derive(Debug)]
pub struct Hub {
    pub server_name: String,
    pub presence: Presence,
    pub palette: Palette,
    pub limits: LimitsConfig,
    admin_password: String,
    next_conn: AtomicU64,
    /// Cancelled once to stop the whole relay. Connections hold child tokens.
    pub shutdown: CancellationToken,
}

impl Hub {
    pub fn new(config: &Config) -> Self {
        Self {
            server_name: config.server.name.clone(),
            presence: Presence::new(),
            palette: Palette::new(config.palette.colors.clone()),
            limits: config.limits.clone(),
            admin_password: config.admin.password.clone(),
            next_conn: AtomicU64::new(1),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn next_conn_id(&self) -> ConnId {
        self.next_conn.fetch_add(1, Ordering::Relaxed)
    }

    pub fn check_admin_password(&self, password: &str) -> bool {
        self.admin_password == password
    }
}
