//! `message`.

use parlor_proto::Reply;

use super::{fanout, Context};
use crate::error::{HandlerError, HandlerResult};

/// Relay a chat line to everyone but the sender.
///
/// The relayed `Message:` line is longer than the command that carried the
/// text, so it is checked against the line limit again before it goes out.
pub fn message(ctx: &mut Context<'_>, text: Option<&str>) -> HandlerResult {
    let text = text.ok_or(HandlerError::EmptyMessage)?;
    let identity = ctx.identity()?;
    let reply = Reply::Message {
        sender: identity.name.clone(),
        color: identity.color,
        text: text.to_string(),
    };
    let limit = ctx.hub.limits.max_line_len;
    if reply.to_string().len() + 1 > limit {
        return Err(HandlerError::MessageTooLong(limit));
    }
    fanout::broadcast(&ctx.hub.presence, reply, Some(ctx.conn_id()));
    Ok(())
}
