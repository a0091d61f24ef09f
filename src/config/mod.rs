//! Layered service configuration
//!
//! Three layers merged in precedence order:
//! 1. Built-in defaults
//! 2. Config file (TOML)
//! 3. CLI overrides

mod defaults;
mod merge;
mod service;

pub use defaults::BuiltinDefaults;
pub use merge::{deep_merge, merge_layers};
pub use service::{ConfigError, ServerConfig, ServiceConfig, ServiceContext, StoreConfig};
