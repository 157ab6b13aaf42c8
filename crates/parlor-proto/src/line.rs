//! Line-based codec for tokio.
//!
//! Reads and writes newline-terminated UTF-8 lines. Decoded lines have their
//! `\n` / `\r\n` terminator removed; encoded lines get a single `\n`.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{ProtocolError, Result};

/// Default maximum line length in bytes, terminator included.
pub const DEFAULT_MAX_LINE_LEN: usize = 1024;

/// Maximum reply line length a client accepts, terminator included.
///
/// Relays must keep their inbound limit well below this, since some replies
/// echo client input back with a tag in front.
pub const MAX_REPLY_LEN: usize = 16 * 1024;

/// Newline-delimited line codec with a length limit.
#[derive(Debug, Clone)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
}

impl LineCodec {
    /// Create a codec with [`DEFAULT_MAX_LINE_LEN`].
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Create a codec with a custom maximum line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
        }
    }

    /// The configured maximum line length.
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        // Look for newline starting from where we left off
        if let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') {
            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if line.len() > self.max_len {
                return Err(ProtocolError::LineTooLong {
                    actual: line.len(),
                    limit: self.max_len,
                });
            }

            let mut bytes = &line[..line.len() - 1];
            if let [rest @ .., b'\r'] = bytes {
                bytes = rest;
            }
            let text = std::str::from_utf8(bytes).map_err(|e| ProtocolError::InvalidUtf8 {
                byte_pos: e.valid_up_to(),
            })?;
            Ok(Some(text.to_string()))
        } else {
            self.next_index = src.len();

            // Check if partial line already exceeds limit
            if src.len() > self.max_len {
                return Err(ProtocolError::LineTooLong {
                    actual: src.len(),
                    limit: self.max_len,
                });
            }

            Ok(None)
        }
    }
}

impl<T: AsRef<str>> Encoder<T> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: T, dst: &mut BytesMut) -> Result<()> {
        let line = line.as_ref();
        if line.contains(['\r', '\n']) {
            return Err(ProtocolError::EmbeddedNewline);
        }
        dst.reserve(line.len() + 1);
        dst.put_slice(line.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}
