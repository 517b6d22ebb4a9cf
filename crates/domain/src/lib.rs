//! Restcheck Domain - Core contract-test types
//!
//! This crate defines the domain model for the restcheck harness:
//! payloads, requests, classified outcomes, checks and scenarios.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod id;
pub mod payload;
pub mod report;
pub mod request;
pub mod response;
pub mod scenario;
pub mod settings;
pub mod state;
pub mod testing;

pub use error::{DomainError, DomainResult};
pub use id::{ResourceId, generate_run_id};
pub use payload::{Comment, Payload, Post};
pub use report::{CaseReport, SuiteReport};
pub use request::{HttpMethod, RequestBody, RequestSpec};
pub use response::{RequestOutcome, TransportFailureKind};
pub use scenario::{Endpoint, Fixture, Scenario, ScenarioCatalog};
pub use settings::HarnessSettings;
pub use state::CaseState;
pub use testing::{Assertion, AssertionResult, Check, FailureKind, StatusExpectation};
