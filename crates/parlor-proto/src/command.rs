//! Client to relay commands.
//!
//! A command line is trimmed, then split once at the first whitespace run:
//! the first token is the command name, the trimmed remainder is the body.
//! An empty remainder means "no body".

use std::fmt;

use crate::name::CREDENTIAL_SEPARATOR;

/// A command line split into name and optional body, borrowing the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandLine<'a> {
    /// First whitespace-delimited token.
    pub name: &'a str,
    /// Trimmed remainder, `None` when empty.
    pub body: Option<&'a str>,
}

/// Split a raw line into command name and body.
///
/// Returns `None` for an empty or all-whitespace line.
///
/// ```
/// use parlor_proto::split_command;
///
/// let cmd = split_command("  message   hello world ").unwrap();
/// assert_eq!(cmd.name, "message");
/// assert_eq!(cmd.body, Some("hello world"));
///
/// assert_eq!(split_command("help").unwrap().body, None);
/// assert!(split_command("   ").is_none());
/// ```
pub fn split_command(line: &str) -> Option<CommandLine<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (name, body) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => {
            let rest = rest.trim();
            (name, (!rest.is_empty()).then_some(rest))
        }
        None => (line, None),
    };
    Some(CommandLine { name, body })
}

/// Split an `adminLogin` body into `(name, password)`.
///
/// Returns `None` when the body lacks the credential separator.
pub fn split_credentials(body: &str) -> Option<(&str, &str)> {
    body.split_once(CREDENTIAL_SEPARATOR)
        .map(|(name, password)| (name.trim(), password))
}

/// A typed client command.
///
/// Commands that take an argument keep it as `Option<String>` so the relay can
/// answer a missing body with a proper rejection instead of a parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `register <name>`
    Register(Option<String>),
    /// `adminLogin <name>--<password>`
    AdminLogin(Option<String>),
    /// `message <text>`
    Message(Option<String>),
    /// `changeUsername <newName>`
    ChangeUsername(Option<String>),
    /// `ban <name>`
    Ban(Option<String>),
    /// `disconnect`
    Disconnect,
    /// `onlineCount`
    OnlineCount,
    /// `onlineList`
    OnlineList,
    /// `help`
    Help,
    /// Anything else; carries the unrecognised command name.
    Unknown(String),
}

impl Command {
    /// Parse one protocol line. Never fails: unrecognised names become
    /// [`Command::Unknown`], and a blank line becomes `Unknown("")`.
    pub fn parse(line: &str) -> Self {
        let Some(CommandLine { name, body }) = split_command(line) else {
            return Command::Unknown(String::new());
        };
        let body = body.map(str::to_string);
        match name {
            "register" => Command::Register(body),
            "adminLogin" => Command::AdminLogin(body),
            "message" => Command::Message(body),
            "changeUsername" => Command::ChangeUsername(body),
            "ban" => Command::Ban(body),
            "disconnect" => Command::Disconnect,
            "onlineCount" => Command::OnlineCount,
            "onlineList" => Command::OnlineList,
            "help" => Command::Help,
            other => Command::Unknown(other.to_string()),
        }
    }

    /// The wire name of this command.
    pub fn name(&self) -> &str {
        match self {
            Command::Register(_) => "register",
            Command::AdminLogin(_) => "adminLogin",
            Command::Message(_) => "message",
            Command::ChangeUsername(_) => "changeUsername",
            Command::Ban(_) => "ban",
            Command::Disconnect => "disconnect",
            Command::OnlineCount => "onlineCount",
            Command::OnlineList => "onlineList",
            Command::Help => "help",
            Command::Unknown(name) => name,
        }
    }

    fn body(&self) -> Option<&str> {
        match self {
            Command::Register(b)
            | Command::AdminLogin(b)
            | Command::Message(b)
            | Command::ChangeUsername(b)
            | Command::Ban(b) => b.as_deref(),
            _ => None,
        }
    }

    /// `register <name>`
    pub fn register(name: impl Into<String>) -> Self {
        Command::Register(Some(name.into()))
    }

    /// `adminLogin <name>--<password>`
    pub fn admin_login(name: &str, password: &str) -> Self {
        Command::AdminLogin(Some(format!("{name}{CREDENTIAL_SEPARATOR}{password}")))
    }

    /// `message <text>`
    pub fn message(text: impl Into<String>) -> Self {
        Command::Message(Some(text.into()))
    }

    /// `changeUsername <newName>`
    pub fn change_username(name: impl Into<String>) -> Self {
        Command::ChangeUsername(Some(name.into()))
    }

    /// `ban <name>`
    pub fn ban(name: impl Into<String>) -> Self {
        Command::Ban(Some(name.into()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        if let Some(body) = self.body() {
            write!(f, " {body}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Command {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Command::parse(s))
    }
}
