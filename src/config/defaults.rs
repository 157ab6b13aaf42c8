//! Default value functions for configuration.

use std::net::SocketAddr;

// =============================================================================
// Server / Listen Defaults
// =============================================================================

pub fn default_server_name() -> String {
    "parlor".to_string()
}

pub fn default_listen_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8082))
}

// =============================================================================
// Admin Defaults
// =============================================================================

/// Shipped admin password. Startup warns while it is still in use.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

pub fn default_admin_password() -> String {
    DEFAULT_ADMIN_PASSWORD.to_string()
}

// =============================================================================
// Limits Defaults
// =============================================================================

pub fn default_max_line_len() -> usize {
    parlor_proto::line::DEFAULT_MAX_LINE_LEN
}

pub fn default_send_queue() -> usize {
    256
}

pub fn default_write_timeout_ms() -> u64 {
    5000
}

// =============================================================================
// Palette Defaults
// =============================================================================

/// 256-color codes handed out round robin at registration.
pub fn default_palette() -> Vec<u8> {
    vec![196, 46, 226, 201, 43, 27, 93, 39, 82, 214]
}
