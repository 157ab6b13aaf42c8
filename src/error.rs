//! Error types for the relay and the client.
//!
//! Handler errors are always answered on the same connection and never
//! affect anyone else. Connection errors end exactly one connection.

use std::time::Duration;

use parlor_proto::{NameError, ProtocolError, Reply};
use thiserror::Error;

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur while handling one command.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("You must register first: use 'register <name>' or 'adminLogin <name>--<password>'")]
    NotRegistered,

    #[error("You are already registered")]
    AlreadyRegistered,

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Message too long (limit {0} bytes)")]
    MessageTooLong(usize),

    #[error("{0}")]
    InvalidName(#[from] NameError),

    #[error("Username is already in use")]
    NameInUse(String),

    #[error("Admins cannot change their username")]
    AdminCannotRename,

    #[error("Invalid admin credentials")]
    BadCredentials,

    #[error("An admin is already logged in")]
    AdminPresent,

    #[error("only admins can use {0}")]
    AdminOnly(&'static str),

    #[error("User '{0}' is not online")]
    NoSuchUser(String),

    #[error("You cannot ban yourself")]
    CannotBanSelf,

    #[error("Unknown command '{0}'. Type help for a list of commands")]
    UnknownCommand(String),

    /// The connection was evicted while the command ran.
    #[error("connection evicted")]
    Evicted,

    /// Client asked to leave; the connection closes after this command.
    #[error("client quit")]
    Quit,
}

impl HandlerError {
    /// Static label for log fields.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotRegistered => "not_registered",
            Self::AlreadyRegistered => "already_registered",
            Self::Usage(_) => "usage",
            Self::EmptyMessage => "empty_message",
            Self::MessageTooLong(_) => "message_too_long",
            Self::InvalidName(_) => "invalid_name",
            Self::NameInUse(_) => "name_in_use",
            Self::AdminCannotRename => "admin_cannot_rename",
            Self::BadCredentials => "bad_credentials",
            Self::AdminPresent => "admin_present",
            Self::AdminOnly(_) => "admin_only",
            Self::NoSuchUser(_) => "no_such_user",
            Self::CannotBanSelf => "cannot_ban_self",
            Self::UnknownCommand(_) => "unknown_command",
            Self::Evicted => "evicted",
            Self::Quit => "quit",
        }
    }

    /// Convert to the reply sent back to the issuing client.
    ///
    /// Rejected renames are answered with `UsernameChangeFailed` so the
    /// client's pending rename resolves; everything else becomes `Error`.
    /// Returns `None` for errors that end the connection instead.
    pub fn to_reply(&self, cmd_name: &str) -> Option<Reply> {
        match self {
            Self::Evicted | Self::Quit => None,
            Self::InvalidName(_) | Self::NameInUse(_) | Self::AdminCannotRename
                if cmd_name == "changeUsername" =>
            {
                Some(Reply::UsernameChangeFailed(self.to_string()))
            }
            _ => Some(Reply::error(self.to_string())),
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Connection Errors (transport)
// ============================================================================

/// Reasons a connection task stops abnormally.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("write did not complete within {0:?}")]
    WriteTimeout(Duration),
}

impl ConnectionError {
    /// Peer-side failures that are routine and logged at debug.
    pub fn is_peer_gone(&self) -> bool {
        match self {
            Self::Protocol(ProtocolError::Io(e)) => matches!(
                e.kind(),
                std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::UnexpectedEof
            ),
            _ => false,
        }
    }
}

// ============================================================================
// Client Errors
// ============================================================================

/// Errors surfaced by the terminal client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("local input failed: {0}")]
    Input(#[source] std::io::Error),

    #[error("input closed before registration completed")]
    AuthAborted,

    #[error("relay closed the connection")]
    Closed,

    #[error("client task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
