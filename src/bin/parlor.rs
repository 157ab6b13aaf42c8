//! parlor - terminal client for a parlor relay.
//!
//! Usage:
//!   parlor --server 127.0.0.1:8082
//!
//! Lines starting with `/` are commands (`/changeUsername bob`,
//! `/onlineList`, `/help`, `/disconnect`); anything else is chat.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use parlor::client::{self, SessionOptions, TerminalSink};
use parlor::telemetry;
use tokio::io::BufReader;
use tracing::Instrument;

#[derive(Parser)]
#[command(name = "parlor", about = "Terminal client for a parlor chat relay")]
struct Args {
    /// Relay address (host:port)
    #[arg(long, env = "PARLOR_SERVER", default_value = "127.0.0.1:8082")]
    server: String,

    /// Seconds to wait for a rename answer before prompting again
    #[arg(long, default_value = "10")]
    rename_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Keep the terminal clean: only warnings and errors, on stderr.
    telemetry::init("warn", false);
    let args = Args::parse();

    let stream = client::connect(&args.server)
        .await
        .with_context(|| format!("connecting to {}", args.server))?;
    println!("Connected to {}", args.server);

    let options = SessionOptions {
        rename_timeout: Duration::from_secs(args.rename_timeout_secs),
    };
    client::run(
        stream,
        BufReader::new(tokio::io::stdin()),
        Arc::new(TerminalSink),
        options,
    )
    .instrument(telemetry::spans::session(&args.server))
    .await?;
    Ok(())
}
