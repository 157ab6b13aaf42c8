//! Error types for the parlor protocol library.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Errors raised while framing or encoding protocol lines.
///
/// Parsing a complete line never fails: unknown commands and untagged replies
/// have their own variants. Only transport-level problems end up here, and
/// every one of them ends the stream it was raised on.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A line exceeded the configured maximum length.
    #[error("line too long: {actual} bytes (limit: {limit})")]
    LineTooLong {
        /// Bytes seen so far.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },

    /// The line was not valid UTF-8.
    #[error("invalid UTF-8 at byte {byte_pos}")]
    InvalidUtf8 {
        /// Byte position where decoding failed.
        byte_pos: usize,
    },

    /// An outgoing frame contained a line break and would split into two frames.
    #[error("outgoing line contains an embedded line break")]
    EmbeddedNewline,
}
