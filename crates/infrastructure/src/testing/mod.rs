//! Contract testing infrastructure.
//!
//! This module provides the assertion engine that evaluates expectations
//! against request outcomes, the case runner that drives one fixture through
//! its lifecycle, and the suite runner that schedules cases.

mod case_runner;
mod runner;
mod suite;

pub use case_runner::CaseRunner;
pub use runner::TestRunner;
pub use suite::SuiteRunner;
