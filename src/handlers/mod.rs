//! Relay command handlers.
//!
//! Each decoded [`Command`] is dispatched to one handler function together
//! with a [`Context`] borrowed from the connection task. Handlers never touch
//! the socket: direct answers are pushed onto `ctx.replies` and written by
//! the connection task after the handler returns, and everything addressed
//! to other connections goes through [`fanout`].
//!
//! Handlers are synchronous. Registry operations are lock-per-shard and
//! deliveries never wait, so nothing here needs to `.await`.

mod admin;
mod connection;
pub mod fanout;
mod messaging;
mod queries;
mod registration;
mod rename;

pub use connection::depart;
pub use queries::HELP_ENTRIES;

use parlor_proto::{Command, Reply};

use crate::error::{HandlerError, HandlerResult};
use crate::state::{ConnId, Hub, Identity, Outbound, Phase};
use crate::telemetry::CommandTimer;

/// Everything a handler may read or change for one command.
pub struct Context<'a> {
    pub hub: &'a Hub,
    /// The issuing connection's own outbound handle.
    pub outbound: &'a Outbound,
    pub phase: &'a mut Phase,
    /// Direct answers to the issuing client, in order.
    pub replies: &'a mut Vec<Reply>,
}

impl Context<'_> {
    #[inline]
    pub fn conn_id(&self) -> ConnId {
        self.outbound.id()
    }

    #[inline]
    pub fn reply(&mut self, reply: Reply) {
        self.replies.push(reply);
    }

    /// Identity of a registered connection.
    pub fn identity(&self) -> Result<&Identity, HandlerError> {
        self.phase.identity().ok_or(HandlerError::NotRegistered)
    }
}

/// Run one command against the relay state.
///
/// Registration commands are only valid while unregistered; every other
/// known command requires a completed registration.
pub fn dispatch(ctx: &mut Context<'_>, command: &Command) -> HandlerResult {
    let _timer = CommandTimer::new(command.name());

    match command {
        Command::Register(name) => registration::register(ctx, name.as_deref()),
        Command::AdminLogin(body) => registration::admin_login(ctx, body.as_deref()),
        _ if !ctx.phase.is_registered() => Err(HandlerError::NotRegistered),
        Command::Message(text) => messaging::message(ctx, text.as_deref()),
        Command::ChangeUsername(name) => rename::change_username(ctx, name.as_deref()),
        Command::Ban(target) => admin::ban(ctx, target.as_deref()),
        Command::Disconnect => connection::disconnect(ctx),
        Command::OnlineCount => queries::online_count(ctx),
        Command::OnlineList => queries::online_list(ctx),
        Command::Help => queries::help(ctx),
        Command::Unknown(name) => Err(HandlerError::UnknownCommand(name.clone())),
    }
}
