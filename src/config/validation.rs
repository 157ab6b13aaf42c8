//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use parlor_proto::MAX_REPLY_LEN;
use thiserror::Error;

/// Smallest accepted `limits.max_line_len`: room for a full-length name in
/// every reply that carries one.
pub const MIN_LINE_LEN: usize = 64;

/// Largest accepted `limits.max_line_len`. Replies that echo input back
/// must still fit the client's reply limit.
pub const MAX_LINE_LEN: usize = MAX_REPLY_LEN / 2;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("admin.password must not be empty")]
    EmptyAdminPassword,
    #[error(
        "limits.max_line_len must be between {min} and {max}, got {0}",
        min = MIN_LINE_LEN,
        max = MAX_LINE_LEN
    )]
    LineLengthOutOfRange(usize),
    #[error("limits.send_queue must be greater than zero")]
    ZeroSendQueue,
    #[error("limits.write_timeout_ms must be greater than zero")]
    ZeroWriteTimeout,
    #[error("palette.colors must contain at least one color")]
    EmptyPalette,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.trim().is_empty() {
        errors.push(ValidationError::MissingServerName);
    }
    if config.admin.password.is_empty() {
        errors.push(ValidationError::EmptyAdminPassword);
    }
    if !(MIN_LINE_LEN..=MAX_LINE_LEN).contains(&config.limits.max_line_len) {
        errors.push(ValidationError::LineLengthOutOfRange(
            config.limits.max_line_len,
        ));
    }
    if config.limits.send_queue == 0 {
        errors.push(ValidationError::ZeroSendQueue);
    }
    if config.limits.write_timeout_ms == 0 {
        errors.push(ValidationError::ZeroWriteTimeout);
    }
    if config.palette.colors.is_empty() {
        errors.push(ValidationError::EmptyPalette);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
