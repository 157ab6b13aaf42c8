//! Scripted relay for driving the terminal client.
//!
//! Tests play the relay side by hand: expect a line, answer (possibly after
//! a delay), close whenever they like.

use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

pub struct FakeRelay {
    listener: TcpListener,
}

#[allow(dead_code)]
impl FakeRelay {
    pub async fn bind() -> anyhow::Result<Self> {
        Ok(Self {
            listener: TcpListener::bind("127.0.0.1:0").await?,
        })
    }

    pub fn address(&self) -> String {
        self.listener
            .local_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_default()
    }

    pub async fn accept(&self) -> anyhow::Result<ScriptedPeer> {
        let (stream, _) = timeout(Duration::from_secs(5), self.listener.accept()).await??;
        Ok(ScriptedPeer::new(stream))
    }
}

/// The relay end of one client connection.
pub struct ScriptedPeer {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

#[allow(dead_code)]
impl ScriptedPeer {
    fn new(stream: TcpStream) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        }
    }

    /// Next line from the client, or `None` on EOF.
    pub async fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        let read = timeout(Duration::from_secs(5), self.reader.read_line(&mut line)).await??;
        Ok((read > 0).then(|| line.trim_end().to_string()))
    }

    /// Read a line and assert it equals `expected`; returns when it arrived.
    pub async fn expect(&mut self, expected: &str) -> anyhow::Result<Instant> {
        match self.read_line().await? {
            Some(line) if line == expected => Ok(Instant::now()),
            other => anyhow::bail!("expected {expected:?}, got {other:?}"),
        }
    }

    pub async fn send(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(format!("{line}\n").as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Drop the connection.
    pub fn close(self) {}
}
