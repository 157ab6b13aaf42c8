//! Admin-only commands: `ban`.

use std::sync::Arc;

use parlor_proto::{fold_name, Reply};
use tracing::{info, warn};

use super::{fanout, Context};
use crate::error::{HandlerError, HandlerResult};
use crate::state::{Delivery, Role};

/// Notice the banned user sees before the connection closes.
pub const BANNED_NOTICE: &str = "You have been banned by the admin";

/// Evict a user: notify them, drop them from the registry, close their
/// connection and tell everyone else.
pub fn ban(ctx: &mut Context<'_>, target: Option<&str>) -> HandlerResult {
    if ctx.phase.role() != Some(Role::Admin) {
        return Err(HandlerError::AdminOnly("ban"));
    }
    let target = target.ok_or(HandlerError::Usage("ban <name>"))?;
    if fold_name(target) == fold_name(&ctx.identity()?.name) {
        return Err(HandlerError::CannotBanSelf);
    }
    let entry = ctx
        .hub
        .presence
        .get(target)
        .ok_or_else(|| HandlerError::NoSuchUser(target.to_string()))?;

    // Queue the notice before closing; the target's task flushes its queue
    // on the way out.
    if entry.outbound.deliver(Arc::new(Reply::error(BANNED_NOTICE))) == Delivery::Dropped {
        warn!(target_conn = entry.conn_id(), "ban notice dropped: send queue full");
    }
    ctx.hub.presence.release(&entry.name, entry.conn_id());
    entry.outbound.close();
    info!(target = %entry.name, target_conn = entry.conn_id(), "user banned");

    fanout::broadcast(
        &ctx.hub.presence,
        Reply::notice(format!("{} has been banned", entry.name)),
        None,
    );
    Ok(())
}
