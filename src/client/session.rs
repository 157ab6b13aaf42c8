//! Client session: authentication, then a network loop and an input loop
//! over one socket.
//!
//! ```text
//!  input lines ──> input loop ──mpsc──> writer task ──> socket
//!                     │  ▲
//!        RenameGate   │  │ released on UsernameChanged / UsernameChangeFailed
//!                     ▼  │
//!  socket ────────> network loop ──> Render
//! ```
//!
//! Both loops stop when `running` is cancelled: by the network loop on EOF
//! or `/disconnect`, or by the writer when the socket fails. Cancelling also
//! closes the rename gate so a pending rename wait ends immediately.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use parking_lot::RwLock;
use parlor_proto::{
    check_name, split_credentials, ClientCodec, Command, ProtocolError, Reply, ADMIN_NAME,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::Framed;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::gate::{GateOutcome, RenameGate};
use super::render::Render;
use crate::error::ClientError;

/// Default wait for a rename answer before the prompt comes back anyway.
pub const DEFAULT_RENAME_TIMEOUT: Duration = Duration::from_secs(10);

/// Session tuning.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub rename_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            rename_timeout: DEFAULT_RENAME_TIMEOUT,
        }
    }
}

/// State shared by the loops.
pub struct Shared {
    identity: RwLock<String>,
    running: CancellationToken,
    gate: RenameGate,
}

impl Shared {
    fn new(identity: String) -> Self {
        Self {
            identity: RwLock::new(identity),
            running: CancellationToken::new(),
            gate: RenameGate::new(),
        }
    }

    pub fn identity(&self) -> String {
        self.identity.read().clone()
    }

    fn stop(&self) {
        self.running.cancel();
        self.gate.close();
    }
}

pub async fn connect(addr: &str) -> Result<TcpStream, ClientError> {
    TcpStream::connect(addr)
        .await
        .map_err(|source| ClientError::Connect {
            addr: addr.to_string(),
            source,
        })
}

/// Run a whole session on `stream`, reading user input from `input`.
///
/// Returns when the relay closes the connection, sends `/disconnect`, or
/// input ends (a `disconnect` is sent first).
pub async fn run<R>(
    stream: TcpStream,
    input: R,
    render: Arc<dyn Render>,
    options: SessionOptions,
) -> Result<(), ClientError>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (mut writer, mut reader) = Framed::new(stream, ClientCodec::new()).split();
    let mut lines = input.lines();

    let identity = authenticate(&mut writer, &mut reader, &mut lines, render.as_ref()).await?;
    info!(identity = %identity, "authenticated");
    let shared = Arc::new(Shared::new(identity));

    let (tx, rx) = mpsc::channel(64);
    let writer_task = tokio::spawn(write_loop(writer, rx, Arc::clone(&shared)));
    let network_task = tokio::spawn(network_loop(
        reader,
        Arc::clone(&shared),
        Arc::clone(&render),
    ));

    let input_result = input_loop(lines, tx, &shared, render.as_ref(), &options).await;
    let network_result = network_task.await?;
    let writer_result = writer_task.await?;

    input_result.and(network_result).and(writer_result)
}

/// The registration command for one line typed at the login prompt, and
/// the identity adopted if it succeeds.
pub fn login_command(line: &str) -> Option<(Command, String)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match line.strip_prefix("/adminLogin") {
        Some(body) => {
            let body = body.trim();
            let command = if body.is_empty() {
                Command::AdminLogin(None)
            } else {
                Command::AdminLogin(Some(body.to_string()))
            };
            Some((command, ADMIN_NAME.to_string()))
        }
        None => Some((Command::register(line), line.to_string())),
    }
}

/// The command for one line typed after login. `/name args` is a raw
/// command, anything else is chat.
pub fn input_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match line.strip_prefix('/') {
        Some(raw) => Some(Command::parse(raw)),
        None => Some(Command::message(line)),
    }
}

/// Send registration commands until one succeeds. Reads exactly one reply
/// per attempt.
async fn authenticate<W, S, R>(
    writer: &mut W,
    reader: &mut S,
    lines: &mut Lines<R>,
    render: &dyn Render,
) -> Result<String, ClientError>
where
    W: Sink<Command, Error = ProtocolError> + Unpin,
    S: Stream<Item = Result<Reply, ProtocolError>> + Unpin,
    R: AsyncBufRead + Unpin,
{
    loop {
        render.status(&format!(
            "Enter a username, or /adminLogin {ADMIN_NAME}--<password>:"
        ));
        render.prompt("");
        let Some(line) = lines.next_line().await.map_err(ClientError::Input)? else {
            return Err(ClientError::AuthAborted);
        };
        let Some((command, identity)) = login_command(&line) else {
            continue;
        };
        if let Command::AdminLogin(Some(body)) = &command
            && split_credentials(body).is_none()
        {
            render.status(&format!("Usage: /adminLogin {ADMIN_NAME}--<password>"));
            continue;
        }

        writer.send(command).await?;
        match reader.next().await {
            None => return Err(ClientError::Closed),
            Some(Err(err)) => return Err(err.into()),
            Some(Ok(reply)) => {
                render.reply(&reply);
                if matches!(reply, Reply::Success(_)) {
                    return Ok(identity);
                }
            }
        }
    }
}

async fn network_loop<S>(
    mut reader: S,
    shared: Arc<Shared>,
    render: Arc<dyn Render>,
) -> Result<(), ClientError>
where
    S: Stream<Item = Result<Reply, ProtocolError>> + Unpin,
{
    let result = loop {
        let next = tokio::select! {
            _ = shared.running.cancelled() => break Ok(()),
            next = reader.next() => next,
        };
        let reply = match next {
            None => break Ok(()),
            Some(Err(err)) => break Err(err.into()),
            Some(Ok(reply)) => reply,
        };

        render.reply(&reply);
        match reply {
            Reply::Disconnect => break Ok(()),
            Reply::UsernameChanged { name, .. } => {
                *shared.identity.write() = name.clone();
                if shared.gate.resolve(GateOutcome::Changed(name)).is_none() {
                    debug!("rename answer with no live request");
                }
            }
            Reply::UsernameChangeFailed(reason) => {
                shared.gate.resolve(GateOutcome::Failed(reason));
            }
            _ => {}
        }
    };
    debug!("network loop finished");
    shared.stop();
    result
}

async fn input_loop<R>(
    mut lines: Lines<R>,
    tx: mpsc::Sender<Command>,
    shared: &Shared,
    render: &dyn Render,
    options: &SessionOptions,
) -> Result<(), ClientError>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        render.prompt(&shared.identity());
        let line = tokio::select! {
            _ = shared.running.cancelled() => return Ok(()),
            line = lines.next_line() => line.map_err(ClientError::Input)?,
        };
        let Some(line) = line else {
            // Local input ended: leave politely.
            let _ = tx.send(Command::Disconnect).await;
            return Ok(());
        };
        let Some(command) = input_command(&line) else {
            continue;
        };

        match &command {
            Command::ChangeUsername(name) => {
                if let Err(err) = check_name(name.as_deref().unwrap_or_default()) {
                    render.status(&format!("Username change failed: {err}"));
                    continue;
                }
                let ticket = shared.gate.begin();
                if tx.send(command).await.is_err() {
                    return Ok(());
                }
                match shared.gate.wait(ticket, options.rename_timeout).await {
                    GateOutcome::Closed => return Ok(()),
                    GateOutcome::TimedOut => {
                        warn!(timeout = ?options.rename_timeout, "rename not answered in time");
                        render.status("No answer to the username change yet");
                    }
                    GateOutcome::Changed(_) | GateOutcome::Failed(_) => {}
                }
            }
            Command::Message(Some(text)) => {
                render.own_message(text);
                if tx.send(command).await.is_err() {
                    return Ok(());
                }
            }
            _ => {
                if tx.send(command).await.is_err() {
                    return Ok(());
                }
            }
        }
    }
}

async fn write_loop<W>(
    mut writer: W,
    mut rx: mpsc::Receiver<Command>,
    shared: Arc<Shared>,
) -> Result<(), ClientError>
where
    W: Sink<Command, Error = ProtocolError> + Unpin,
{
    while let Some(command) = rx.recv().await {
        if let Err(err) = writer.send(command).await {
            shared.stop();
            return Err(err.into());
        }
    }
    let _ = writer.close().await;
    Ok(())
}
