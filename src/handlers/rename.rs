//! `changeUsername`.

use parlor_proto::{check_name, Reply};
use tracing::info;

use super::{fanout, Context};
use crate::error::{HandlerError, HandlerResult};
use crate::state::{Phase, RenameError};

pub fn change_username(ctx: &mut Context<'_>, new: Option<&str>) -> HandlerResult {
    if matches!(ctx.phase, Phase::Admin(_)) {
        return Err(HandlerError::AdminCannotRename);
    }
    let old = ctx.identity()?.name.clone();
    let new = new.unwrap_or_default();
    check_name(new)?;

    if new != old {
        ctx.hub
            .presence
            .rename(&old, new, ctx.conn_id())
            .map_err(|err| match err {
                RenameError::Taken => HandlerError::NameInUse(new.to_string()),
                RenameError::Evicted => HandlerError::Evicted,
            })?;
    }

    if let Some(identity) = ctx.phase.identity_mut() {
        identity.name = new.to_string();
    }
    info!(old = %old, new, "user renamed");

    ctx.reply(Reply::UsernameChanged {
        name: new.to_string(),
        text: format!("You are now known as {new}"),
    });
    if new != old {
        fanout::broadcast(
            &ctx.hub.presence,
            Reply::notice(format!("{old} is now known as {new}")),
            Some(ctx.conn_id()),
        );
    }
    Ok(())
}
