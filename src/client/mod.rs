//! Terminal chat client.
//!
//! [`session::run`] drives one connection: a blocking authentication
//! exchange, then two concurrent loops coordinated through a
//! [`RenameGate`] so the prompt never shows an unconfirmed username.

pub mod gate;
pub mod render;
pub mod session;

pub use gate::{GateOutcome, RenameGate, RenameTicket};
pub use render::{Render, TerminalSink};
pub use session::{connect, run, SessionOptions, DEFAULT_RENAME_TIMEOUT};
