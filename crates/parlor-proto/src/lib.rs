//! # parlor-proto
//!
//! The line protocol spoken between the parlor relay and its clients.
//!
//! Every frame is one UTF-8 line. Clients send commands (`register alice`,
//! `message hello`), the relay answers with tagged replies
//! (`Success:Welcome to the chatroom, alice`) or untagged notices.
//!
//! ## Features
//!
//! - A tokenizer that splits a command line into name and optional body once
//! - Typed [`Command`] and [`Reply`] enums shared by both ends
//! - Username rules ([`check_name`], [`fold_name`]) used by the relay's
//!   registry and by the client before it sends a rename
//! - Optional Tokio codecs ([`ServerCodec`], [`ClientCodec`]) on top of a
//!   newline [`LineCodec`](line::LineCodec)
//!
//! ## Quick Start
//!
//! ```rust
//! use parlor_proto::{Command, Reply};
//!
//! let cmd = Command::parse("changeUsername  bob ");
//! assert_eq!(cmd, Command::ChangeUsername(Some("bob".to_string())));
//!
//! let reply = Reply::parse("Message:alice:196:hi there");
//! assert_eq!(
//!     reply,
//!     Reply::Message {
//!         sender: "alice".to_string(),
//!         color: 196,
//!         text: "hi there".to_string(),
//!     }
//! );
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod name;
pub mod reply;

#[cfg(feature = "tokio")]
pub mod codec;
#[cfg(feature = "tokio")]
pub mod line;

pub use self::command::{split_command, split_credentials, Command, CommandLine};
pub use self::error::ProtocolError;
pub use self::name::{
    check_name, fold_name, is_reserved, NameError, ADMIN_NAME, CREDENTIAL_SEPARATOR, MAX_NAME_LEN,
};
pub use self::reply::{Reply, LIST_DELIMITER};

#[cfg(feature = "tokio")]
pub use self::codec::{ClientCodec, ServerCodec};
#[cfg(feature = "tokio")]
pub use self::line::{DEFAULT_MAX_LINE_LEN, MAX_REPLY_LEN};
