//! `onlineCount`, `onlineList` and `help`.

use parlor_proto::Reply;

use super::Context;
use crate::error::HandlerResult;

/// Entries of the `Help` reply.
pub const HELP_ENTRIES: &[&str] = &[
    "message <text> - send a message to everyone",
    "changeUsername <name> - change your username",
    "onlineCount - number of users online",
    "onlineList - list users online",
    "ban <name> - remove a user (admin only)",
    "disconnect - leave the chatroom",
    "help - show this list",
];

pub fn online_count(ctx: &mut Context<'_>) -> HandlerResult {
    let count = ctx.hub.presence.count();
    ctx.reply(Reply::OnlineCount(count));
    Ok(())
}

/// The roster, split over as many `OnlineList` lines as the line limit
/// requires. Each line numbers its own entries from 1.
pub fn online_list(ctx: &mut Context<'_>) -> HandlerResult {
    let names = ctx.hub.presence.names();
    for page in roster_pages(names, ctx.hub.limits.max_line_len) {
        ctx.reply(Reply::OnlineList(page));
    }
    Ok(())
}

/// `OnlineList:` plus the newline.
const ROSTER_OVERHEAD: usize = "OnlineList:".len() + 1;

/// Wire length of the entry at `index` within one line: `|N.name`.
fn entry_len(index: usize, name: &str) -> usize {
    usize::from(index > 0) + (index + 1).to_string().len() + 1 + name.len()
}

fn roster_pages(names: Vec<String>, limit: usize) -> Vec<Vec<String>> {
    let mut pages = Vec::new();
    let mut page: Vec<String> = Vec::new();
    let mut len = ROSTER_OVERHEAD;
    for name in names {
        let mut cost = entry_len(page.len(), &name);
        if !page.is_empty() && len + cost > limit {
            pages.push(std::mem::take(&mut page));
            len = ROSTER_OVERHEAD;
            cost = entry_len(0, &name);
        }
        len += cost;
        page.push(name);
    }
    if !page.is_empty() || pages.is_empty() {
        pages.push(page);
    }
    pages
}

pub fn help(ctx: &mut Context<'_>) -> HandlerResult {
    ctx.reply(Reply::Help(
        HELP_ENTRIES.iter().map(|entry| entry.to_string()).collect(),
    ));
    Ok(())
}
