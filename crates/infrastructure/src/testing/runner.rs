//! Assertion engine.
//!
//! Evaluates expectations against a `RequestOutcome` and produces checks.
//! Every expectation is evaluated; a failed check never stops the ones
//! after it.

use std::collections::BTreeMap;

use regex::Regex;
use restcheck_domain::{
    Assertion, AssertionResult, Check, FailureKind, RequestOutcome, StatusExpectation,
};
use serde_json::Value;

/// Maximum number of body characters quoted in a failure detail.
const PREVIEW_CHARS: usize = 100;

/// Runs expectations against request outcomes.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestRunner;

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Evaluates all expectations against an outcome.
    ///
    /// When the outcome is a failure, a leading check names the failure and
    /// every expectation fails with the same classified message.
    #[must_use]
    pub fn run(&self, assertions: &[Assertion], outcome: &RequestOutcome) -> AssertionResult {
        let mut result = AssertionResult::new();

        if let (Some(kind), Some(message)) = (outcome.failure_kind(), outcome.failure_message()) {
            result.push(Check::fail(kind, "Request completed", message));
        }

        for assertion in assertions {
            result.push(self.run_assertion(assertion, outcome));
        }
        result
    }

    /// Evaluates a single expectation.
    #[must_use]
    pub fn run_assertion(&self, assertion: &Assertion, outcome: &RequestOutcome) -> Check {
        match assertion {
            Assertion::StatusCode { expected } => self.expect_status(outcome, expected),
            Assertion::BodyContains { substrings } => {
                self.expect_body_contains(outcome, substrings.as_slice())
            }
            Assertion::BodyContainsKeys { keys } => {
                self.expect_body_contains_all(outcome, keys.as_slice())
            }
            Assertion::BodyNotEmpty => self.check_body_not_empty(assertion, outcome),
            Assertion::IsJson => self.check_is_json(assertion, outcome),
            Assertion::EchoesFields { fields } => {
                self.check_echoes_fields(assertion, outcome, fields)
            }
        }
    }

    /// Checks the status code.
    #[must_use]
    pub fn expect_status(&self, outcome: &RequestOutcome, expected: &StatusExpectation) -> Check {
        let description = format!("Status code {}", expected.description());
        let Some(actual) = outcome.status() else {
            return not_received(description, outcome);
        };

        if expected.matches(actual) {
            Check::pass(description, actual.to_string())
        } else {
            Check::fail(
                FailureKind::ProtocolViolation,
                description,
                format!("Expected status {}, got {actual}", expected.description()),
            )
        }
    }

    /// Checks that the body contains every literal substring.
    #[must_use]
    pub fn expect_body_contains<S: AsRef<str>>(
        &self,
        outcome: &RequestOutcome,
        substrings: &[S],
    ) -> Check {
        let assertion = Assertion::body_contains(substrings);
        let description = assertion.description();
        let Some(body) = outcome.body() else {
            return not_received(description, outcome);
        };

        let missing: Vec<&str> = substrings
            .iter()
            .map(|s| s.as_ref())
            .filter(|s| !body.contains(s))
            .collect();

        if missing.is_empty() {
            Check::pass(description, preview(body))
        } else {
            Check::fail(
                FailureKind::ContractViolation,
                description,
                format!(
                    "Body does not contain {}; body: {}",
                    quoted(&missing),
                    preview(body)
                ),
            )
        }
    }

    /// Checks that the body contains every JSON key, as `"key":`.
    #[must_use]
    pub fn expect_body_contains_all<S: AsRef<str>>(
        &self,
        outcome: &RequestOutcome,
        keys: &[S],
    ) -> Check {
        let assertion = Assertion::body_contains_keys(keys);
        let description = assertion.description();
        let Some(body) = outcome.body() else {
            return not_received(description, outcome);
        };

        let mut missing = Vec::new();
        for key in keys {
            let key: &str = key.as_ref();
            let pattern = format!(r#""{}"\s*:"#, regex::escape(key));
            match Regex::new(&pattern) {
                Ok(regex) if regex.is_match(body) => {}
                Ok(_) => missing.push(key),
                Err(e) => {
                    return Check::fail(
                        FailureKind::ContractViolation,
                        description,
                        format!("Invalid key pattern '{pattern}': {e}"),
                    );
                }
            }
        }

        if missing.is_empty() {
            Check::pass(description, preview(body))
        } else {
            Check::fail(
                FailureKind::ContractViolation,
                description,
                format!("Body is missing keys {}; body: {}", quoted(&missing), preview(body)),
            )
        }
    }

    fn check_body_not_empty(&self, assertion: &Assertion, outcome: &RequestOutcome) -> Check {
        let description = assertion.description();
        match outcome.body() {
            None => not_received(description, outcome),
            Some(body) if body.trim().is_empty() => Check::fail(
                FailureKind::ContractViolation,
                description,
                "Response body is empty",
            ),
            Some(body) => Check::pass(description, format!("{} bytes", body.len())),
        }
    }

    fn check_is_json(&self, assertion: &Assertion, outcome: &RequestOutcome) -> Check {
        let description = assertion.description();
        let Some(body) = outcome.body() else {
            return not_received(description, outcome);
        };
        match serde_json::from_str::<Value>(body) {
            Ok(_) => Check::pass(description, preview(body)),
            Err(e) => Check::fail(
                FailureKind::ContractViolation,
                description,
                format!("Body is not valid JSON: {e}"),
            ),
        }
    }

    fn check_echoes_fields(
        &self,
        assertion: &Assertion,
        outcome: &RequestOutcome,
        fields: &BTreeMap<String, Value>,
    ) -> Check {
        let description = assertion.description();
        let Some(body) = outcome.body() else {
            return not_received(description, outcome);
        };

        let json = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Check::fail(
                    FailureKind::ContractViolation,
                    description,
                    format!("Expected a JSON object, got {}", preview(&other.to_string())),
                );
            }
            Err(e) => {
                return Check::fail(
                    FailureKind::ContractViolation,
                    description,
                    format!("Failed to parse body as JSON: {e}"),
                );
            }
        };

        let mismatches: Vec<_> = fields
            .iter()
            .filter_map(|(name, expected)| match json.get(name) {
                Some(actual) if actual == expected => None,
                Some(actual) => Some(format!("'{name}': expected {expected}, got {actual}")),
                None => Some(format!("'{name}': missing")),
            })
            .collect();

        if mismatches.is_empty() {
            Check::pass(description, preview(body))
        } else {
            Check::fail(
                FailureKind::ContractViolation,
                description,
                mismatches.join("; "),
            )
        }
    }
}

/// Failed check for an expectation that had no response to look at.
fn not_received(description: String, outcome: &RequestOutcome) -> Check {
    Check::fail(
        outcome
            .failure_kind()
            .unwrap_or(FailureKind::TransportFailure),
        description,
        outcome
            .failure_message()
            .unwrap_or_else(|| "No response received".to_string()),
    )
}

/// First characters of `body`, cut on a char boundary.
fn preview(body: &str) -> String {
    match body.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

fn quoted(items: &[&str]) -> String {
    let quoted: Vec<_> = items.iter().map(|s| format!("'{s}'")).collect();
    quoted.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use restcheck_domain::{Payload, Post};
    use std::time::Duration;

    fn response(status: u16, body: &str) -> RequestOutcome {
        RequestOutcome::success(status, body, Duration::from_millis(50))
    }

    #[test]
    fn test_status_code_exact() {
        let runner = TestRunner::new();
        let outcome = response(201, "{}");

        assert!(runner.expect_status(&outcome, &StatusExpectation::Exact(201)).passed);

        let check = runner.expect_status(&outcome, &StatusExpectation::Exact(200));
        assert!(!check.passed);
        assert_eq!(check.kind, Some(FailureKind::ProtocolViolation));
        assert_eq!(check.detail, "Expected status = 200, got 201");
    }

    #[test]
    fn test_delete_accepts_200_or_204() {
        let runner = TestRunner::new();
        let expected = StatusExpectation::OneOf(vec![200, 204]);
        assert!(runner.expect_status(&response(200, "{}"), &expected).passed);
        assert!(runner.expect_status(&response(204, ""), &expected).passed);
        assert!(!runner.expect_status(&response(404, ""), &expected).passed);
    }

    #[test]
    fn test_body_contains() {
        let runner = TestRunner::new();
        let outcome = response(201, r#"{"title": "foo", "body": "bar", "id": 101}"#);

        assert!(runner.expect_body_contains(&outcome, &["foo", "bar"]).passed);

        let check = runner.expect_body_contains(&outcome, &["foo", "baz", "qux"]);
        assert!(!check.passed);
        assert_eq!(check.kind, Some(FailureKind::ContractViolation));
        assert!(check.detail.starts_with("Body does not contain 'baz', 'qux'"));
    }

    #[test]
    fn test_body_contains_keys_tolerates_whitespace() {
        let runner = TestRunner::new();
        let outcome = response(200, "[\n  {\n    \"postId\": 2,\n    \"id\": 6\n  }\n]");

        assert!(runner.expect_body_contains_all(&outcome, &["postId", "id"]).passed);
        assert!(!runner.expect_body_contains_all(&outcome, &["email"]).passed);
    }

    #[test]
    fn test_key_match_requires_key_position() {
        let runner = TestRunner::new();
        // "postId" appears only as a value, never as a key
        let outcome = response(200, r#"{"name": "postId"}"#);
        assert!(!runner.expect_body_contains_all(&outcome, &["postId"]).passed);
    }

    #[test]
    fn test_body_not_empty() {
        let runner = TestRunner::new();
        assert!(runner.run_assertion(&Assertion::BodyNotEmpty, &response(200, "[]")).passed);
        assert!(!runner.run_assertion(&Assertion::BodyNotEmpty, &response(200, "  ")).passed);
    }

    #[test]
    fn test_is_json() {
        let runner = TestRunner::new();
        assert!(runner.run_assertion(&Assertion::IsJson, &response(200, "{}")).passed);
        assert!(!runner.run_assertion(&Assertion::IsJson, &response(200, "<html>")).passed);
    }

    #[test]
    fn test_echoes_fields() {
        let runner = TestRunner::new();
        let fields = Payload::Post(Post::new(1, "Updated title", "Updated body")).echo_fields();
        let assertion = Assertion::EchoesFields { fields };

        let echoed = response(
            200,
            r#"{"userId": 1, "title": "Updated title", "body": "Updated body", "id": 1}"#,
        );
        assert!(runner.run_assertion(&assertion, &echoed).passed);

        let changed = response(200, r#"{"userId": 2, "title": "Updated title", "id": 1}"#);
        let check = runner.run_assertion(&assertion, &changed);
        assert!(!check.passed);
        assert!(check.detail.contains("'userId': expected 1, got 2"));
        assert!(check.detail.contains("'body': missing"));
    }

    #[test]
    fn test_failures_accumulate() {
        let runner = TestRunner::new();
        let outcome = response(500, "oops");
        let result = runner.run(
            &[
                Assertion::status(200),
                Assertion::body_contains(&["Updated title"]),
                Assertion::body_contains(&["Updated body"]),
            ],
            &outcome,
        );
        assert_eq!(result.total(), 3);
        assert_eq!(result.failed_count(), 3);
        assert_eq!(
            result.first_failure_kind(),
            Some(FailureKind::ProtocolViolation)
        );
    }

    #[test]
    fn test_failed_outcome_fails_every_expectation() {
        let runner = TestRunner::new();
        let outcome = RequestOutcome::timeout("request timed out after 30000ms");
        let result = runner.run(&[Assertion::status(200), Assertion::BodyNotEmpty], &outcome);

        assert_eq!(result.total(), 3);
        assert!(result.checks.iter().all(|c| !c.passed));
        assert!(result.checks.iter().all(|c| c.kind == Some(FailureKind::Timeout)));
        assert_eq!(result.checks[0].description, "Request completed");
        assert_eq!(
            result.checks[0].detail,
            "Timeout: request timed out after 30000ms"
        );
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let body = "é".repeat(150);
        let cut = preview(&body);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), PREVIEW_CHARS + 3);
    }
}
