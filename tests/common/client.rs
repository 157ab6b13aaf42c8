//! Test relay client.
//!
//! Speaks the raw line protocol so tests can assert on exact replies.

use std::time::Duration;

use parlor_proto::{Command, Reply};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test client connection.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

#[allow(dead_code)]
impl TestClient {
    /// Connect to a test relay.
    pub async fn connect(address: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
        })
    }

    /// Send one raw line.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with('\n') {
            self.writer.write_all(b"\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    pub async fn send(&mut self, command: Command) -> anyhow::Result<()> {
        self.send_raw(&command.to_string()).await
    }

    /// Receive a single reply.
    pub async fn recv(&mut self) -> anyhow::Result<Reply> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive a reply with a timeout. EOF is an error.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<Reply> {
        let mut line = String::new();
        let read = timeout(dur, self.reader.read_line(&mut line)).await??;
        if read == 0 {
            anyhow::bail!("connection closed");
        }
        Ok(Reply::parse(line.trim_end()))
    }

    /// Receive replies until `predicate` matches; returns all of them.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<Reply>>
    where
        F: FnMut(&Reply) -> bool,
    {
        let mut replies = Vec::new();
        loop {
            let reply = self.recv().await?;
            let done = predicate(&reply);
            replies.push(reply);
            if done {
                return Ok(replies);
            }
        }
    }

    /// Discard everything already sent to this client.
    pub async fn drain(&mut self) {
        while self
            .recv_timeout(Duration::from_millis(50))
            .await
            .is_ok()
        {}
    }

    /// Assert nothing arrives for `dur`.
    pub async fn expect_silence(&mut self, dur: Duration) -> anyhow::Result<()> {
        match self.recv_timeout(dur).await {
            Ok(reply) => anyhow::bail!("expected silence, got {reply:?}"),
            Err(err) if err.is::<tokio::time::error::Elapsed>() => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Wait for the relay to close the connection, skipping any replies.
    pub async fn expect_closed(&mut self) -> anyhow::Result<()> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = timeout(Duration::from_secs(5), self.reader.read_line(&mut line)).await;
            match read {
                Ok(Ok(0)) | Ok(Err(_)) => return Ok(()),
                Ok(Ok(_)) => continue,
                Err(_) => anyhow::bail!("connection still open"),
            }
        }
    }

    /// Register as `name`; the relay must answer with `Success`.
    pub async fn register(&mut self, name: &str) -> anyhow::Result<()> {
        match self.try_register(name).await? {
            Reply::Success(_) => Ok(()),
            other => anyhow::bail!("registration of {name} failed: {other:?}"),
        }
    }

    /// Send `register name` and return the relay's answer.
    pub async fn try_register(&mut self, name: &str) -> anyhow::Result<Reply> {
        self.send(Command::register(name)).await?;
        self.recv().await
    }

    /// Send a rename and return its answer, skipping unrelated notices.
    pub async fn rename(&mut self, name: &str) -> anyhow::Result<Reply> {
        self.send(Command::change_username(name)).await?;
        let replies = self
            .recv_until(|r| {
                matches!(
                    r,
                    Reply::UsernameChanged { .. } | Reply::UsernameChangeFailed(_)
                )
            })
            .await?;
        replies
            .into_iter()
            .last()
            .ok_or_else(|| anyhow::anyhow!("no rename answer"))
    }

    /// Ask for the roster, skipping unrelated notices.
    pub async fn online_list(&mut self) -> anyhow::Result<Vec<String>> {
        self.send(Command::OnlineList).await?;
        let replies = self
            .recv_until(|r| matches!(r, Reply::OnlineList(_)))
            .await?;
        match replies.into_iter().last() {
            Some(Reply::OnlineList(names)) => Ok(names),
            other => anyhow::bail!("unexpected {other:?}"),
        }
    }
}
