//! Relay to client replies.
//!
//! Every reply is `Tag:body` except the bare `/disconnect` instruction and
//! untagged notices, which are rendered as-is. `Message` and
//! `UsernameChanged` bodies carry further colon-separated fields; roster and
//! help bodies are joined with [`LIST_DELIMITER`].

use std::fmt;

/// Joins the entries of `OnlineList` and `Help` bodies.
pub const LIST_DELIMITER: char = '|';

const DISCONNECT: &str = "/disconnect";

/// A tagged relay reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Registration or admin login accepted.
    Success(String),
    /// Request rejected; the connection is unaffected.
    Error(String),
    /// A chat line from another user.
    Message {
        /// Display name of the sender.
        sender: String,
        /// Sender's 256-color palette code.
        color: u8,
        /// Message text, may contain colons.
        text: String,
    },
    /// Rename accepted (sent to the renaming client only).
    UsernameChanged {
        /// The confirmed new name.
        name: String,
        /// Human readable confirmation.
        text: String,
    },
    /// Rename rejected (sent to the renaming client only).
    UsernameChangeFailed(String),
    /// Number of registered users.
    OnlineCount(usize),
    /// Registered display names in roster order.
    OnlineList(Vec<String>),
    /// Command summaries.
    Help(Vec<String>),
    /// Relay-initiated teardown instruction.
    Disconnect,
    /// Untagged informational line (joins, leaves, bans).
    Notice(String),
}

impl Reply {
    /// Decode one reply line. Never fails: anything without a known tag, or a
    /// known tag with a malformed body, becomes [`Reply::Notice`].
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if line == DISCONNECT {
            return Reply::Disconnect;
        }
        let notice = || Reply::Notice(line.to_string());
        let Some((tag, body)) = line.split_once(':') else {
            return notice();
        };
        match tag {
            "Success" => Reply::Success(body.to_string()),
            "Error" => Reply::Error(body.to_string()),
            "UsernameChangeFailed" => Reply::UsernameChangeFailed(body.to_string()),
            "Message" => {
                let mut fields = body.splitn(3, ':');
                match (fields.next(), fields.next(), fields.next()) {
                    (Some(sender), Some(color), Some(text)) => match color.parse() {
                        Ok(color) => Reply::Message {
                            sender: sender.to_string(),
                            color,
                            text: text.to_string(),
                        },
                        Err(_) => notice(),
                    },
                    _ => notice(),
                }
            }
            "UsernameChanged" => {
                let (name, text) = body.split_once(':').unwrap_or((body, ""));
                Reply::UsernameChanged {
                    name: name.to_string(),
                    text: text.to_string(),
                }
            }
            "OnlineCount" => match body.trim().parse() {
                Ok(n) => Reply::OnlineCount(n),
                Err(_) => notice(),
            },
            "OnlineList" => Reply::OnlineList(
                split_list(body)
                    .map(|entry| strip_ordinal(entry).to_string())
                    .collect(),
            ),
            "Help" => Reply::Help(split_list(body).map(str::to_string).collect()),
            _ => notice(),
        }
    }

    /// The tag this reply is sent under, `None` for untagged notices.
    pub fn tag(&self) -> Option<&'static str> {
        Some(match self {
            Reply::Success(_) => "Success",
            Reply::Error(_) => "Error",
            Reply::Message { .. } => "Message",
            Reply::UsernameChanged { .. } => "UsernameChanged",
            Reply::UsernameChangeFailed(_) => "UsernameChangeFailed",
            Reply::OnlineCount(_) => "OnlineCount",
            Reply::OnlineList(_) => "OnlineList",
            Reply::Help(_) => "Help",
            Reply::Disconnect => DISCONNECT,
            Reply::Notice(_) => return None,
        })
    }

    /// Convenience constructor for [`Reply::Error`].
    pub fn error(reason: impl Into<String>) -> Self {
        Reply::Error(reason.into())
    }

    /// Convenience constructor for [`Reply::Notice`].
    pub fn notice(text: impl Into<String>) -> Self {
        Reply::Notice(text.into())
    }
}

fn split_list(body: &str) -> impl Iterator<Item = &str> {
    body.split(LIST_DELIMITER).filter(|entry| !entry.is_empty())
}

/// Drop a leading `N.` roster position.
fn strip_ordinal(entry: &str) -> &str {
    match entry.split_once('.') {
        Some((n, rest)) if !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()) => rest,
        _ => entry,
    }
}

fn write_list<I, T>(f: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    I: IntoIterator<Item = T>,
    T: fmt::Display,
{
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            write!(f, "{LIST_DELIMITER}")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Success(text) => write!(f, "Success:{text}"),
            Reply::Error(reason) => write!(f, "Error:{reason}"),
            Reply::Message {
                sender,
                color,
                text,
            } => write!(f, "Message:{sender}:{color}:{text}"),
            Reply::UsernameChanged { name, text } => write!(f, "UsernameChanged:{name}:{text}"),
            Reply::UsernameChangeFailed(reason) => write!(f, "UsernameChangeFailed:{reason}"),
            Reply::OnlineCount(n) => write!(f, "OnlineCount:{n}"),
            Reply::OnlineList(names) => {
                f.write_str("OnlineList:")?;
                write_list(
                    f,
                    names
                        .iter()
                        .enumerate()
                        .map(|(i, name)| format!("{}.{name}", i + 1)),
                )
            }
            Reply::Help(entries) => {
                f.write_str("Help:")?;
                write_list(f, entries)
            }
            Reply::Disconnect => f.write_str(DISCONNECT),
            Reply::Notice(text) => f.write_str(text),
        }
    }
}
