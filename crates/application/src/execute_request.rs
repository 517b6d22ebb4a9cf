//! Execute Request Use Case
//!
//! Issues one HTTP call through a client handle and returns a classified
//! `RequestOutcome`. Nothing escapes this use case as an error: malformed
//! targets, transport failures and timeouts all become outcome values.

use std::time::Instant;

use restcheck_domain::{RequestOutcome, RequestSpec};
use tracing::{debug, warn};
use url::Url;

use crate::client::ClientHandle;
use crate::ports::HttpTransport;

/// Resolves `path` against `base`, rejecting anything that is not a
/// well-formed path beneath the base address.
///
/// # Errors
///
/// Returns a description of the problem when the path contains whitespace
/// or control characters, cannot be joined, or resolves outside the base
/// address (another origin, or above the base path).
pub fn resolve_target(base: &Url, path: &str) -> Result<Url, String> {
    if let Some(c) = path.chars().find(|c| c.is_whitespace() || c.is_control()) {
        return Err(format!("path {path:?} contains illegal character {c:?}"));
    }

    let url = base
        .join(path)
        .map_err(|e| format!("cannot resolve {path:?} against {base}: {e}"))?;

    if url.origin() != base.origin() {
        return Err(format!("path {path:?} leaves base address {base}"));
    }
    if !url.path().starts_with(base.path()) {
        return Err(format!("path {path:?} escapes base path {}", base.path()));
    }

    Ok(url)
}

/// Use case for executing a single request.
///
/// # Example
///
/// ```ignore
/// let handle = ClientHandle::acquire(&ReqwestProvider::new(), base, timeout)?;
/// let outcome = ExecuteRequest::new(&handle).execute(&RequestSpec::get("posts")).await;
/// ```
pub struct ExecuteRequest<'a, T> {
    handle: &'a ClientHandle<T>,
}

impl<'a, T: HttpTransport> ExecuteRequest<'a, T> {
    /// Creates the use case over a client handle.
    #[must_use]
    pub const fn new(handle: &'a ClientHandle<T>) -> Self {
        Self { handle }
    }

    /// Executes the request and classifies the result.
    ///
    /// The path is validated first; an invalid path yields `InvalidTarget`
    /// without contacting the transport. The whole call, including reading
    /// the body, is bounded by the handle's timeout.
    pub async fn execute(&self, request: &RequestSpec) -> RequestOutcome {
        let url = match resolve_target(self.handle.base_url(), &request.path) {
            Ok(url) => url,
            Err(message) => {
                warn!(request = %request.label(), %message, "invalid target");
                return RequestOutcome::invalid_target(message);
            }
        };

        let timeout = self.handle.timeout();
        debug!(request = %request.label(), %url, "dispatching");
        let start = Instant::now();

        let call = self.handle.transport().send(url, request);
        let outcome = match tokio::time::timeout(timeout, call).await {
            Ok(Ok(response)) => {
                RequestOutcome::success(response.status, response.body, start.elapsed())
            }
            Ok(Err(error)) => error.into_outcome(),
            Err(_) => RequestOutcome::timeout(format!(
                "request timed out after {}ms",
                timeout.as_millis()
            )),
        };

        match outcome.failure_message() {
            Some(message) => warn!(request = %request.label(), %message, "request failed"),
            None => debug!(
                request = %request.label(),
                status = outcome.status().unwrap_or_default(),
                "response received"
            ),
        }
        outcome
    }
}
