//! Typed tokio codecs for both ends of a connection.
//!
//! [`ServerCodec`] is what the relay frames a socket with: it decodes
//! [`Command`]s and encodes [`Reply`]s. [`ClientCodec`] is the mirror image.
//! Both wrap [`LineCodec`] and silently skip blank lines.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::command::Command;
use crate::error::{ProtocolError, Result};
use crate::line::{LineCodec, MAX_REPLY_LEN};
use crate::reply::Reply;

fn next_line(inner: &mut LineCodec, src: &mut BytesMut) -> Result<Option<String>> {
    loop {
        match inner.decode(src)? {
            Some(line) if line.trim().is_empty() => continue,
            other => return Ok(other),
        }
    }
}

/// Relay-side codec: `Command` in, `Reply` out.
#[derive(Debug, Clone, Default)]
pub struct ServerCodec {
    inner: LineCodec,
}

impl ServerCodec {
    /// Create a codec with the default line limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec with a custom maximum line length in bytes.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            inner: LineCodec::with_max_len(max_len),
        }
    }
}

impl Decoder for ServerCodec {
    type Item = Command;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Command>> {
        Ok(next_line(&mut self.inner, src)?.map(|line| Command::parse(&line)))
    }
}

impl Encoder<Reply> for ServerCodec {
    type Error = ProtocolError;

    fn encode(&mut self, reply: Reply, dst: &mut BytesMut) -> Result<()> {
        self.inner.encode(reply.to_string(), dst)
    }
}

impl Encoder<&Reply> for ServerCodec {
    type Error = ProtocolError;

    fn encode(&mut self, reply: &Reply, dst: &mut BytesMut) -> Result<()> {
        self.inner.encode(reply.to_string(), dst)
    }
}

/// Client-side codec: `Reply` in, `Command` out.
///
/// Accepts reply lines up to [`MAX_REPLY_LEN`] bytes, larger than any relay's
/// inbound limit.
#[derive(Debug, Clone)]
pub struct ClientCodec {
    inner: LineCodec,
}

impl ClientCodec {
    /// Create a codec accepting replies up to [`MAX_REPLY_LEN`] bytes.
    pub fn new() -> Self {
        Self::with_max_len(MAX_REPLY_LEN)
    }

    /// Create a codec with a custom maximum line length in bytes.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            inner: LineCodec::with_max_len(max_len),
        }
    }
}

impl Default for ClientCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for ClientCodec {
    type Item = Reply;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Reply>> {
        Ok(next_line(&mut self.inner, src)?.map(|line| Reply::parse(&line)))
    }
}

impl Encoder<Command> for ClientCodec {
    type Error = ProtocolError;

    fn encode(&mut self, command: Command, dst: &mut BytesMut) -> Result<()> {
        self.inner.encode(command.to_string(), dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::DEFAULT_MAX_LINE_LEN;

    #[test]
    fn server_decodes_commands_and_skips_blank_lines() {
        let mut codec = ServerCodec::new();
        let mut buf = BytesMut::from("\r\n   \nregister alice\nmessage hi there\n");

        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(Command::register("alice"))
        );
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(Command::message("hi there"))
        );
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }

    #[test]
    fn client_reads_what_server_writes() {
        let mut server = ServerCodec::new();
        let mut client = ClientCodec::new();
        let mut wire = BytesMut::new();

        let sent = Reply::UsernameChanged {
            name: "bob".into(),
            text: "You are now known as bob".into(),
        };
        server.encode(&sent, &mut wire).unwrap();
        server.encode(Reply::Disconnect, &mut wire).unwrap();

        assert_eq!(client.decode(&mut wire).unwrap(), Some(sent));
        assert_eq!(client.decode(&mut wire).unwrap(), Some(Reply::Disconnect));
    }

    #[test]
    fn client_accepts_replies_longer_than_a_command_line() {
        let mut client = ClientCodec::new();
        let text = "x".repeat(DEFAULT_MAX_LINE_LEN);
        let mut wire = BytesMut::from(format!("Message:alice:46:{text}\n").as_str());

        assert_eq!(
            client.decode(&mut wire).unwrap(),
            Some(Reply::Message {
                sender: "alice".into(),
                color: 46,
                text,
            })
        );
    }

    #[test]
    fn client_refuses_multi_line_message() {
        let mut client = ClientCodec::new();
        let mut wire = BytesMut::new();
        let result = client.encode(Command::message("one\nregister two"), &mut wire);
        assert!(matches!(result, Err(ProtocolError::EmbeddedNewline)));
    }
}
