//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig, AdminConfig)
//! - [`listen`]: Network listener configuration (ListenConfig)
//! - [`limits`]: Per-connection limits (LimitsConfig)
//! - [`validation`]: Startup validation of a loaded config

pub mod defaults;
mod limits;
mod listen;
mod types;
mod validation;

pub use limits::LimitsConfig;
pub use listen::ListenConfig;
pub use types::{AdminConfig, Config, ConfigError, PaletteConfig, ServerConfig};
pub use validation::{ValidationError, validate};
