//! Network module.
//!
//! Contains the Gateway (TCP listener), the per-connection task and the
//! [`Relay`] handle that ties them to the shared state.

mod connection;
mod gateway;

pub use connection::Connection;
pub use gateway::{Gateway, Relay};
