//! Restcheck Application - ports and use cases
//!
//! This crate defines the boundary to the HTTP transport (ports), the
//! per-case client handle, and the request execution use case that turns
//! every call into a classified `RequestOutcome`.

pub mod client;
pub mod error;
pub mod execute_request;
pub mod ports;

pub use client::{ClientHandle, ClientSlot};
pub use error::{ApplicationError, ApplicationResult};
pub use execute_request::{ExecuteRequest, resolve_target};
