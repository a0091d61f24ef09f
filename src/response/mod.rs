//! Execute-response documents
//!
//! Construction of the WPS 1.0.0 `ExecuteResponse` tree, durable persistence
//! of the status file, and terminal cleanup.

mod execute;

pub use execute::{ExecuteResponse, SCHEMA_LOCATION, WPS_VERSION};
