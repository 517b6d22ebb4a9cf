//! Case and suite reports.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::request::HttpMethod;
use crate::state::CaseState;
use crate::testing::AssertionResult;

/// Everything recorded about one case run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReport {
    /// Unique run identifier.
    pub run_id: Uuid,
    /// Scenario the fixture belongs to.
    pub scenario: String,
    /// Fixture label.
    pub label: String,
    /// Method of the fixture.
    pub method: HttpMethod,
    /// Resolved path, when the request got built.
    pub path: Option<String>,
    /// When the case started.
    pub started_at: DateTime<Utc>,
    /// Wall time of the whole case in milliseconds.
    pub duration_ms: u64,
    /// Lifecycle states visited, in order.
    pub states: Vec<CaseState>,
    /// Checks evaluated for the case.
    pub result: AssertionResult,
    /// Response body, kept when diagnostic echo is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
}

impl CaseReport {
    /// Returns true if every check passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.result.passed()
    }

    /// Returns the last state reached.
    #[must_use]
    pub fn final_state(&self) -> CaseState {
        self.states.last().copied().unwrap_or_default()
    }

    /// Display name: `scenario / label`.
    #[must_use]
    pub fn name(&self) -> String {
        format!("{} / {}", self.scenario, self.label)
    }
}

/// Results from running a set of cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Case reports, in catalog order.
    pub cases: Vec<CaseReport>,
    /// Total number of cases.
    pub total: usize,
    /// Number of passed cases.
    pub passed: usize,
    /// Number of failed cases.
    pub failed: usize,
    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl SuiteReport {
    /// Create a new suite report.
    #[must_use]
    pub fn new(cases: Vec<CaseReport>, duration_ms: u64) -> Self {
        let total = cases.len();
        let passed = cases.iter().filter(|c| c.passed()).count();
        let failed = total - passed;

        Self {
            cases,
            total,
            passed,
            failed,
            duration_ms,
        }
    }

    /// Check if all cases passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Get pass rate as percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    /// Renders a plain-text summary. Passed cases take one line; failed
    /// cases list every failed check.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for case in &self.cases {
            let verdict = if case.passed() { "PASS" } else { "FAIL" };
            let _ = writeln!(out, "[{verdict}] {} ({}ms)", case.name(), case.duration_ms);
            for check in case.result.failures() {
                let kind = check.kind.map(|k| k.as_str()).unwrap_or("Failure");
                let _ = writeln!(out, "    - {kind}: {}: {}", check.description, check.detail);
            }
            if let Some(body) = &case.response_body {
                let _ = writeln!(out, "    body: {body}");
            }
        }
        let _ = writeln!(
            out,
            "{} cases: {} passed, {} failed ({:.1}%) in {}ms",
            self.total,
            self.passed,
            self.failed,
            self.pass_rate(),
            self.duration_ms
        );
        out
    }
}
