//! WPS execute-response status documents
//!
//! This crate renders execution-status documents for OGC WPS 1.0.0 Execute
//! requests: given a run's lifecycle status it builds the `ExecuteResponse`
//! XML tree, durably persists it to the run's status file, and delivers it
//! (and the persisted copies) over HTTP.

pub mod config;
pub mod exception;
pub mod http;
pub mod process;
pub mod request;
pub mod response;
pub mod status;
pub mod xml;

pub use config::{ServiceConfig, ServiceContext};
pub use exception::{ExceptionCode, WpsError};
pub use process::{ExecuteInput, ExecuteOutput, ProcessMetadata};
pub use request::ExecuteRequest;
pub use response::ExecuteResponse;
pub use status::{ExecutionStatus, StatusPercentage};
