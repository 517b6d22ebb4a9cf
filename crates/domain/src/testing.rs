//! Contract expectations, checks and their accumulated result.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An expectation evaluated against a request outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Check response status code.
    StatusCode {
        /// Expected status code, set or range.
        expected: StatusExpectation,
    },
    /// Check body contains every literal substring.
    BodyContains {
        /// Substrings that must all appear.
        substrings: Vec<String>,
    },
    /// Check body contains every JSON key (`"key":`).
    BodyContainsKeys {
        /// Key names without quotes.
        keys: Vec<String>,
    },
    /// Check body is present and non-empty.
    BodyNotEmpty,
    /// Check body is valid JSON.
    IsJson,
    /// Check the body is a JSON object echoing the given field values.
    EchoesFields {
        /// Field name to expected value.
        fields: BTreeMap<String, serde_json::Value>,
    },
}

impl Assertion {
    /// Expect an exact status code.
    #[must_use]
    pub const fn status(code: u16) -> Self {
        Self::StatusCode {
            expected: StatusExpectation::Exact(code),
        }
    }

    /// Expect any of the given status codes.
    #[must_use]
    pub fn status_one_of(codes: &[u16]) -> Self {
        Self::StatusCode {
            expected: StatusExpectation::OneOf(codes.to_vec()),
        }
    }

    /// Expect the body to contain each substring.
    #[must_use]
    pub fn body_contains<S: AsRef<str>>(substrings: &[S]) -> Self {
        Self::BodyContains {
            substrings: substrings.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    /// Expect the body to contain each JSON key.
    #[must_use]
    pub fn body_contains_keys<S: AsRef<str>>(keys: &[S]) -> Self {
        Self::BodyContainsKeys {
            keys: keys.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("Status code {}", expected.description()),
            Self::BodyContains { substrings } => {
                format!("Body contains {}", quoted_list(substrings))
            }
            Self::BodyContainsKeys { keys } => {
                let keys: Vec<_> = keys.iter().map(|k| format!("\"{k}\":")).collect();
                format!("Body contains keys {}", keys.join(", "))
            }
            Self::BodyNotEmpty => "Body is not empty".to_string(),
            Self::IsJson => "Body is valid JSON".to_string(),
            Self::EchoesFields { fields } => {
                let names: Vec<_> = fields.keys().cloned().collect();
                format!("Body echoes fields {}", names.join(", "))
            }
        }
    }

    /// Returns the failure kind reported when this assertion does not hold.
    #[must_use]
    pub const fn violation_kind(&self) -> FailureKind {
        match self {
            Self::StatusCode { .. } => FailureKind::ProtocolViolation,
            _ => FailureKind::ContractViolation,
        }
    }
}

fn quoted_list(items: &[String]) -> String {
    let quoted: Vec<_> = items.iter().map(|s| format!("'{s}'")).collect();
    quoted.join(", ")
}

/// Expected status code value or range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Range of status codes (e.g., 200-299).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
    /// One of multiple status codes.
    OneOf(Vec<u16>),
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => status >= *min && status <= *max,
            Self::OneOf(codes) => codes.contains(&status),
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => format!("= {code}"),
            Self::Range { min, max } => format!("in {min}-{max}"),
            Self::OneOf(codes) => {
                let codes_str: Vec<_> = codes.iter().map(ToString::to_string).collect();
                format!("in [{}]", codes_str.join(", "))
            }
        }
    }

    /// Create a "success" expectation (200-299).
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }
}

impl Default for StatusExpectation {
    fn default() -> Self {
        Self::success()
    }
}

/// Error taxonomy a failed check is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The case was invalid before any call (e.g. identifier <= 0, no client).
    PreconditionViolation,
    /// Connection-level failure.
    TransportFailure,
    /// The call exceeded its timeout.
    Timeout,
    /// The request target was malformed.
    InvalidTarget,
    /// Unexpected status code.
    ProtocolViolation,
    /// Expected field or substring absent from the body.
    ContractViolation,
}

impl FailureKind {
    /// Returns the kind name as shown in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreconditionViolation => "PreconditionViolation",
            Self::TransportFailure => "TransportFailure",
            Self::Timeout => "Timeout",
            Self::InvalidTarget => "InvalidTarget",
            Self::ProtocolViolation => "ProtocolViolation",
            Self::ContractViolation => "ContractViolation",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one individual check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    /// What was checked.
    pub description: String,
    /// Whether the check held.
    pub passed: bool,
    /// Actual value on success, reason on failure.
    pub detail: String,
    /// Taxonomy kind when failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
}

impl Check {
    /// Create a passed check.
    #[must_use]
    pub fn pass(description: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            passed: true,
            detail: detail.into(),
            kind: None,
        }
    }

    /// Create a failed check.
    #[must_use]
    pub fn fail(
        kind: FailureKind,
        description: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            passed: false,
            detail: detail.into(),
            kind: Some(kind),
        }
    }
}

/// Ordered checks of one case; the verdict is the AND of all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionResult {
    /// Checks in evaluation order.
    pub checks: Vec<Check>,
}

impl AssertionResult {
    /// Create an empty result.
    #[must_use]
    pub const fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Appends a check. Failed checks never stop later ones from being recorded.
    pub fn push(&mut self, check: Check) {
        self.checks.push(check);
    }

    /// Appends several checks.
    pub fn extend(&mut self, checks: impl IntoIterator<Item = Check>) {
        self.checks.extend(checks);
    }

    /// Returns true when every check passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Iterates over failed checks.
    pub fn failures(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter().filter(|c| !c.passed)
    }

    /// Number of checks.
    #[must_use]
    pub fn total(&self) -> usize {
        self.checks.len()
    }

    /// Number of failed checks.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    /// Kind of the first failed check, if any.
    #[must_use]
    pub fn first_failure_kind(&self) -> Option<FailureKind> {
        self.failures().find_map(|c| c.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_expectation_exact() {
        let exp = StatusExpectation::Exact(200);
        assert!(exp.matches(200));
        assert!(!exp.matches(201));
    }

    #[test]
    fn test_status_expectation_range() {
        let exp = StatusExpectation::success();
        assert!(exp.matches(200));
        assert!(exp.matches(299));
        assert!(!exp.matches(300));
        assert!(!exp.matches(199));
    }

    #[test]
    fn test_status_expectation_one_of() {
        let exp = StatusExpectation::OneOf(vec![200, 204]);
        assert!(exp.matches(200));
        assert!(exp.matches(204));
        assert!(!exp.matches(202));
    }

    #[test]
    fn test_assertion_description() {
        assert_eq!(Assertion::status(201).description(), "Status code = 201");
        assert_eq!(
            Assertion::status_one_of(&[200, 204]).description(),
            "Status code in [200, 204]"
        );
        assert_eq!(
            Assertion::body_contains(&["foo", "bar"]).description(),
            "Body contains 'foo', 'bar'"
        );
        assert_eq!(
            Assertion::body_contains_keys(&["postId"]).description(),
            "Body contains keys \"postId\":"
        );
    }

    #[test]
    fn test_violation_kinds() {
        assert_eq!(
            Assertion::status(200).violation_kind(),
            FailureKind::ProtocolViolation
        );
        assert_eq!(
            Assertion::BodyNotEmpty.violation_kind(),
            FailureKind::ContractViolation
        );
    }

    #[test]
    fn test_assertion_serde_shape() {
        let assertion: Assertion =
            serde_json::from_str(r#"{"type": "status_code", "expected": [200, 204]}"#)
                .unwrap_or(Assertion::IsJson);
        assert_eq!(assertion, Assertion::status_one_of(&[200, 204]));
    }

    #[test]
    fn test_assertion_result_accumulates() {
        let mut result = AssertionResult::new();
        result.push(Check::pass("Status code = 200", "200"));
        result.push(Check::fail(
            FailureKind::ContractViolation,
            "Body contains 'x'",
            "missing 'x'",
        ));
        result.push(Check::fail(
            FailureKind::ProtocolViolation,
            "Status code = 201",
            "got 200",
        ));

        assert!(!result.passed());
        assert_eq!(result.total(), 3);
        assert_eq!(result.failed_count(), 2);
        assert_eq!(
            result.first_failure_kind(),
            Some(FailureKind::ContractViolation)
        );
    }

    #[test]
    fn test_empty_result_passes() {
        assert!(AssertionResult::new().passed());
    }
}
