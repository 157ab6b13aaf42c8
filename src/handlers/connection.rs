//! `disconnect` and connection teardown.

use parlor_proto::Reply;
use tracing::info;

use super::{fanout, Context};
use crate::error::{HandlerError, HandlerResult};
use crate::state::{ConnId, Hub, Phase};

/// Tell the client to go away, announce the departure and end the
/// connection.
pub fn disconnect(ctx: &mut Context<'_>) -> HandlerResult {
    let previous = ctx.phase.close();
    depart(ctx.hub, ctx.conn_id(), previous, true);
    ctx.reply(Reply::Disconnect);
    Err(HandlerError::Quit)
}

/// Release whatever `previous` held in the registry.
///
/// Called exactly once per connection with the phase it had when it ended;
/// a `Closed` or `Unregistered` phase is a no-op, and a registry entry that
/// was already evicted (ban) is left alone.
pub fn depart(hub: &Hub, conn: ConnId, previous: Phase, announce: bool) {
    let Some(identity) = previous.identity() else {
        return;
    };
    let released = hub.presence.release(&identity.name, conn).is_some();
    if released {
        info!(name = %identity.name, "user left");
    }
    if released && announce {
        fanout::broadcast(
            &hub.presence,
            Reply::notice(format!("{} has left the chatroom", identity.name)),
            Some(conn),
        );
    }
}
