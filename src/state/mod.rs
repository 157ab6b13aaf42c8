//! State management module.
//!
//! Contains the [`Hub`] (shared relay state), the presence registry and the
//! per-connection lifecycle.

mod hub;
mod outbound;
mod palette;
mod presence;
mod session;

pub use hub::Hub;
pub use outbound::{ConnId, Delivery, Outbound};
pub use palette::Palette;
pub use presence::{NameTaken, Presence, PresenceEntry, RenameError, Role};
pub use session::{Identity, Phase};
