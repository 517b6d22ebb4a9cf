//! Case runner.
//!
//! Drives one fixture through `Idle → ClientAcquired → RequestBuilt →
//! RequestSent → Asserted → TornDown`. The runner exposes the three hooks a
//! test runner calls (`setup`, `run_case`, `teardown`); `run_isolated` calls
//! them in order and always tears down, whatever happened before.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use restcheck_application::ports::TransportProvider;
use restcheck_application::{ApplicationResult, ClientHandle, ClientSlot, ExecuteRequest};
use restcheck_domain::{
    AssertionResult, CaseReport, CaseState, Check, DomainError, FailureKind, Fixture,
    HarnessSettings, RequestSpec, generate_run_id,
};
use tracing::{debug, info, warn};

use super::TestRunner;
use crate::serialization::encode_payload;

/// Runs a single case with its own client handle.
pub struct CaseRunner<P: TransportProvider> {
    provider: Arc<P>,
    settings: Arc<HarnessSettings>,
    slot: ClientSlot<P::Transport>,
    state: CaseState,
    trail: Vec<CaseState>,
    setup_error: Option<String>,
    path: Option<String>,
    response_body: Option<String>,
    assertions: TestRunner,
}

impl<P: TransportProvider> CaseRunner<P> {
    /// Creates a runner in the `Idle` state.
    #[must_use]
    pub fn new(provider: Arc<P>, settings: Arc<HarnessSettings>) -> Self {
        Self {
            provider,
            settings,
            slot: ClientSlot::empty(),
            state: CaseState::Idle,
            trail: vec![CaseState::Idle],
            setup_error: None,
            path: None,
            response_body: None,
            assertions: TestRunner::new(),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> CaseState {
        self.state
    }

    /// States visited so far, in order.
    #[must_use]
    pub fn trail(&self) -> &[CaseState] {
        &self.trail
    }

    /// Setup hook: acquires this case's client handle.
    ///
    /// # Errors
    ///
    /// Returns the acquisition error. The runner stays `Idle`, and a
    /// following `run_case` fails its precondition without any call.
    pub fn setup(&mut self) -> ApplicationResult<()> {
        match ClientHandle::acquire(
            self.provider.as_ref(),
            &self.settings.base_url,
            self.settings.timeout(),
        ) {
            Ok(handle) => {
                self.slot.fill(handle);
                self.advance(CaseState::ClientAcquired);
                Ok(())
            }
            Err(error) => {
                warn!(%error, "client acquisition failed");
                self.setup_error = Some(error.to_string());
                Err(error)
            }
        }
    }

    /// Case hook: builds, sends and asserts the fixture's request.
    ///
    /// Never fails: every problem is reported as a failed check.
    pub async fn run_case(&mut self, fixture: &Fixture) -> AssertionResult {
        let mut result = AssertionResult::new();

        if !self.slot.is_acquired() {
            let detail = self.setup_error.as_ref().map_or_else(
                || "HttpClient is not initialized.".to_string(),
                |e| format!("HttpClient is not initialized: {e}"),
            );
            result.push(Check::fail(
                FailureKind::PreconditionViolation,
                "Client acquired",
                detail,
            ));
            return result;
        }

        let request = match self.build_request(fixture) {
            Ok(request) => request,
            Err(check) => {
                result.push(check);
                self.advance(CaseState::Asserted);
                return result;
            }
        };
        self.path = Some(request.path.clone());
        self.advance(CaseState::RequestBuilt);

        let Some(handle) = self.slot.get() else {
            // Unreachable: the slot was checked above and nothing released it
            result.push(Check::fail(
                FailureKind::PreconditionViolation,
                "Client acquired",
                "HttpClient is not initialized.",
            ));
            return result;
        };
        let outcome = ExecuteRequest::new(handle).execute(&request).await;
        self.advance(CaseState::RequestSent);

        if self.settings.echo_bodies {
            if let Some(body) = outcome.body() {
                info!(case = %fixture.label, body, "response body");
                self.response_body = Some(body.to_string());
            }
        }

        result.extend(self.assertions.run(&fixture.expect, &outcome).checks);
        self.advance(CaseState::Asserted);
        result
    }

    /// Teardown hook: releases the client handle.
    ///
    /// Idempotent, and safe when `setup` never succeeded.
    pub fn teardown(&mut self) {
        self.slot.release();
        if !self.state.is_terminal() {
            self.advance(CaseState::TornDown);
        }
    }

    /// Runs `setup`, `run_case` and `teardown` for one fixture and reports.
    pub async fn run_isolated(
        provider: Arc<P>,
        settings: Arc<HarnessSettings>,
        scenario: &str,
        fixture: &Fixture,
    ) -> CaseReport {
        let run_id = generate_run_id();
        let started_at = Utc::now();
        let start = Instant::now();
        let mut runner = Self::new(provider, settings);

        // A failed setup is reported by run_case as a precondition failure
        let _ = runner.setup();
        let mut result = runner.run_case(fixture).await;
        runner.teardown();
        if let Some(expected) = fixture.expect_failure {
            result = settle_expected_failure(expected, result);
        }

        let passed = result.passed();
        if passed {
            info!(scenario, case = %fixture.label, "case passed");
        } else {
            warn!(
                scenario,
                case = %fixture.label,
                failed = result.failed_count(),
                "case failed"
            );
        }

        CaseReport {
            run_id,
            scenario: scenario.to_string(),
            label: fixture.label.clone(),
            method: fixture.method,
            path: runner.path.take(),
            started_at,
            duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            states: runner.trail.clone(),
            result,
            response_body: runner.response_body.take(),
        }
    }

    /// Validates identifiers, checks the payload fits the method and
    /// serializes it.
    fn build_request(&self, fixture: &Fixture) -> Result<RequestSpec, Check> {
        let path = fixture.endpoint.path().map_err(|e| match e {
            DomainError::InvalidIdentifier(raw) => Check::fail(
                FailureKind::PreconditionViolation,
                "Resource identifier is valid",
                format!("Invalid resource identifier {raw}: must be greater than zero"),
            ),
            other => Check::fail(
                FailureKind::InvalidTarget,
                "Request target is valid",
                other.to_string(),
            ),
        })?;

        let mut request = RequestSpec::new(fixture.method, path);
        if let Some(payload) = &fixture.payload {
            if !fixture.method.has_body() {
                return Err(Check::fail(
                    FailureKind::PreconditionViolation,
                    "Payload allowed for method",
                    format!("{} requests do not carry a payload", fixture.method),
                ));
            }
            payload.validate().map_err(|e| {
                Check::fail(
                    FailureKind::PreconditionViolation,
                    "Payload identifiers are valid",
                    e.to_string(),
                )
            })?;
            let body = encode_payload(payload, &fixture.content_type).map_err(|e| {
                Check::fail(
                    FailureKind::PreconditionViolation,
                    "Payload serializes",
                    e.to_string(),
                )
            })?;
            request = request.with_body(body);
        }
        Ok(request)
    }

    fn advance(&mut self, next: CaseState) {
        if !self.state.can_transition_to(next) {
            warn!(from = %self.state, to = %next, "unexpected case state transition");
        }
        debug!(from = %self.state, to = %next, "case state");
        self.state = next;
        self.trail.push(next);
    }
}

/// Verdict for a negative case: it passes only when the first failure has
/// the expected kind. Evaluated checks are kept; failures of the expected
/// kind are marked as held, and the verdict check is appended last.
fn settle_expected_failure(expected: FailureKind, result: AssertionResult) -> AssertionResult {
    let description = format!("Fails with {expected}");
    let verdict = match result.failures().next() {
        Some(check) if check.kind == Some(expected) => {
            Check::pass(description, check.detail.clone())
        }
        Some(check) => Check::fail(
            FailureKind::ContractViolation,
            description,
            format!(
                "Expected {expected}, got {}: {}",
                check.kind.map_or("Failure", FailureKind::as_str),
                check.detail
            ),
        ),
        None => Check::fail(
            FailureKind::ContractViolation,
            description,
            format!("Expected {expected}, but every check passed"),
        ),
    };

    let mut settled = AssertionResult::new();
    for check in result.checks {
        if verdict.passed && !check.passed && check.kind == Some(expected) {
            let detail = format!("expected: {}", check.detail);
            settled.push(Check {
                passed: true,
                detail,
                ..check
            });
        } else {
            settled.push(check);
        }
    }
    settled.push(verdict);
    settled
}
