//! HTTP transport port

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use restcheck_domain::{RequestOutcome, RequestSpec};
use thiserror::Error;
use url::Url;

/// Status and fully buffered body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl RawResponse {
    /// Creates a raw response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Errors a transport can report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Host name could not be resolved.
    #[error("DNS resolution failed for {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection failed or dropped.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The call exceeded its timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// Redirect limit exceeded.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Redirect limit.
        max: usize,
    },

    /// The client could not be constructed.
    #[error("client construction failed: {0}")]
    Build(String),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Classifies this error as a `RequestOutcome`.
    #[must_use]
    pub fn into_outcome(self) -> RequestOutcome {
        let message = self.to_string();
        match self {
            Self::Timeout { .. } => RequestOutcome::timeout(message),
            Self::DnsError { .. } | Self::ConnectionRefused { .. } | Self::ConnectionFailed(_) => {
                RequestOutcome::connection_failure(message)
            }
            Self::TooManyRedirects { .. } | Self::Build(_) | Self::Other(_) => {
                RequestOutcome::unknown_failure(message)
            }
        }
    }
}

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + Send + 'a>>;

/// Port for sending a single HTTP request.
///
/// This trait abstracts the HTTP library so the executor and case runner
/// can be exercised against in-memory transports.
pub trait HttpTransport: Send + Sync {
    /// Sends `request` to the already-resolved `url` and buffers the whole body.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` for network, timeout or other failures.
    /// Non-2xx statuses are not errors.
    fn send<'a>(&'a self, url: Url, request: &'a RequestSpec) -> TransportFuture<'a>;
}

/// Port for creating one transport per case.
pub trait TransportProvider: Send + Sync {
    /// Transport type handed out.
    type Transport: HttpTransport;

    /// Creates a transport whose calls time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Build` if the transport cannot be created.
    fn create(&self, timeout: Duration) -> Result<Self::Transport, TransportError>;
}
