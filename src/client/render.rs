//! Turning replies into terminal output.

use std::io::Write;

use parlor_proto::{Reply, MAX_NAME_LEN};

/// Where the client session sends everything the user should see.
pub trait Render: Send + Sync {
    /// A reply from the relay.
    fn reply(&self, reply: &Reply);

    /// Local echo of a chat line the user just sent.
    fn own_message(&self, text: &str);

    /// Client-side status text (not from the relay).
    fn status(&self, text: &str);

    /// Input prompt showing the current identity.
    fn prompt(&self, identity: &str);
}

const RESET: &str = "\x1b[0m";
const RED: u8 = 196;

fn paint(color: u8, text: &str) -> String {
    format!("\x1b[38;5;{color}m{text}{RESET}")
}

/// A chat line: the name padded to the longest possible username.
pub fn format_chat(sender: &str, color: u8, text: &str) -> String {
    let name = format!("{sender:<width$}", width = MAX_NAME_LEN);
    format!("{}: {text}", paint(color, &name))
}

/// Human readable text for one reply.
pub fn format_reply(reply: &Reply) -> String {
    match reply {
        Reply::Success(text) | Reply::Notice(text) => text.clone(),
        Reply::Error(reason) => paint(RED, &format!("Error: {reason}")),
        Reply::Message {
            sender,
            color,
            text,
        } => format_chat(sender, *color, text),
        Reply::UsernameChanged { text, .. } => text.clone(),
        Reply::UsernameChangeFailed(reason) => {
            paint(RED, &format!("Username change failed: {reason}"))
        }
        Reply::OnlineCount(count) => format!("Users online: {count}"),
        Reply::OnlineList(names) => {
            let mut out = String::from("Users online:");
            for (i, name) in names.iter().enumerate() {
                out.push_str(&format!("\n  {}. {name}", i + 1));
            }
            out
        }
        Reply::Help(entries) => {
            let mut out = String::from("Commands:");
            for entry in entries {
                out.push_str(&format!("\n  /{entry}"));
            }
            out
        }
        Reply::Disconnect => "Disconnected from the chatroom".to_string(),
    }
}

/// ANSI 256-color output on stdout.
#[derive(Debug, Default)]
pub struct TerminalSink;

impl TerminalSink {
    fn line(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        // Start from column 0 in case a prompt is on screen.
        let _ = writeln!(out, "\r{text}");
        let _ = out.flush();
    }
}

impl Render for TerminalSink {
    fn reply(&self, reply: &Reply) {
        self.line(&format_reply(reply));
    }

    fn own_message(&self, text: &str) {
        let name = format!("{:<width$}", "you", width = MAX_NAME_LEN);
        self.line(&format!("{name}: {text}"));
    }

    fn status(&self, text: &str) {
        self.line(text);
    }

    fn prompt(&self, identity: &str) {
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "{identity}> ");
        let _ = out.flush();
    }
}
