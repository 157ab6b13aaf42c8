//! Integration test common infrastructure.
//!
//! Provides an in-process relay, a line-level test client, a scripted fake
//! relay for driving the terminal client, and a recording render sink.

pub mod client;
pub mod fake_relay;
pub mod recorder;
pub mod server;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use fake_relay::{FakeRelay, ScriptedPeer};
#[allow(unused_imports)]
pub use recorder::{Recorder, Shown};
#[allow(unused_imports)]
pub use server::TestServer;
