//! parlor - a line-oriented multi-user chat relay and its terminal client.
//!
//! The relay ([`network::Relay`]) accepts TCP connections, registers each
//! one under a unique username and fans chat lines out to everyone else.
//! The client ([`client`]) authenticates once and then runs a network loop
//! and an input loop over the same socket.
//!
//! Wire types live in the `parlor-proto` crate and are shared by both ends.

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod network;
pub mod state;
pub mod telemetry;
