//! `register` and `adminLogin`.

use parlor_proto::{check_name, is_reserved, split_credentials, Reply, ADMIN_NAME};
use tracing::info;

use super::{fanout, Context};
use crate::error::{HandlerError, HandlerResult};
use crate::state::{Identity, Phase, Role};

pub fn register(ctx: &mut Context<'_>, name: Option<&str>) -> HandlerResult {
    if ctx.phase.is_registered() {
        return Err(HandlerError::AlreadyRegistered);
    }
    let name = name.unwrap_or_default();
    check_name(name)?;

    let palette = &ctx.hub.palette;
    let color = ctx
        .hub
        .presence
        .claim_with(name, Role::Member, ctx.outbound, || palette.assign())
        .map_err(|_| HandlerError::NameInUse(name.to_string()))?
        .color;

    *ctx.phase = Phase::Member(Identity {
        name: name.to_string(),
        color,
    });
    info!(name, color, "user registered");

    ctx.reply(Reply::Success(format!("Welcome to the chatroom, {name}")));
    announce_join(ctx, name);
    Ok(())
}

pub fn admin_login(ctx: &mut Context<'_>, body: Option<&str>) -> HandlerResult {
    if ctx.phase.is_registered() {
        return Err(HandlerError::AlreadyRegistered);
    }
    let (name, password) = body
        .and_then(split_credentials)
        .ok_or(HandlerError::Usage("adminLogin <name>--<password>"))?;
    if !is_reserved(name) || !ctx.hub.check_admin_password(password) {
        info!(name, "admin login rejected");
        return Err(HandlerError::BadCredentials);
    }

    let palette = &ctx.hub.palette;
    let color = ctx
        .hub
        .presence
        .claim_with(ADMIN_NAME, Role::Admin, ctx.outbound, || palette.assign())
        .map_err(|_| HandlerError::AdminPresent)?
        .color;

    *ctx.phase = Phase::Admin(Identity {
        name: ADMIN_NAME.to_string(),
        color,
    });
    info!("admin logged in");

    ctx.reply(Reply::Success(format!(
        "Welcome to the chatroom, {ADMIN_NAME}"
    )));
    announce_join(ctx, ADMIN_NAME);
    Ok(())
}

fn announce_join(ctx: &Context<'_>, name: &str) {
    fanout::broadcast(
        &ctx.hub.presence,
        Reply::notice(format!("'{name}' has joined the chatroom")),
        Some(ctx.conn_id()),
    );
}
