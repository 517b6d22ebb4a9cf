//! HTTP response domain types

mod outcome;

pub use outcome::{RequestOutcome, TransportFailureKind};
