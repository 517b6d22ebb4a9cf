//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpTransport` and `TransportProvider` ports
//! using the reqwest library. One `reqwest::Client` is built per case, with
//! the case's timeout baked in.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Url};
use restcheck_application::ports::{
    HttpTransport, RawResponse, TransportError, TransportFuture, TransportProvider,
};
use restcheck_domain::{HttpMethod, RequestSpec};

/// Redirects followed before a call fails.
const MAX_REDIRECTS: usize = 10;

/// Transport backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout_ms: u64,
}

impl ReqwestTransport {
    /// Creates a transport whose calls time out after `timeout`.
    ///
    /// Default configuration:
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    /// - User-Agent: "restcheck/<version>"
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Build` if the client cannot be created.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("restcheck/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;

        Ok(Self::with_client(client, timeout))
    }

    /// Creates a transport from a custom reqwest client.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn with_client(client: Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout { timeout_ms };
        }

        let host = || {
            error
                .url()
                .and_then(|u| u.host_str().map(ToString::to_string))
                .unwrap_or_else(|| "unknown".to_string())
        };

        if error.is_connect() {
            let message = error_chain(error);
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return TransportError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lower.contains("refused") {
                return TransportError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return TransportError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return TransportError::TooManyRedirects { max: MAX_REDIRECTS };
        }

        if error.is_request() || error.is_body() {
            return TransportError::ConnectionFailed(error_chain(error));
        }

        TransportError::Other(error_chain(error))
    }
}

/// Joins an error with its sources; reqwest's top-level message alone is
/// rarely enough to tell a refused connection from a reset one.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(&'a self, url: Url, request: &'a RequestSpec) -> TransportFuture<'a> {
        let timeout_ms = self.timeout_ms;

        Box::pin(async move {
            let mut builder = self
                .client
                .request(Self::to_reqwest_method(request.method), url);

            // Content type goes out exactly as the fixture spelled it
            if let Some(body) = &request.body {
                builder = builder
                    .header(CONTENT_TYPE, body.content_type.as_str())
                    .body(body.content.clone());
            }

            let response = builder
                .send()
                .await
                .map_err(|e| Self::map_error(&e, timeout_ms))?;

            let status = response.status().as_u16();

            let body_bytes = response
                .bytes()
                .await
                .map_err(|e| Self::map_error(&e, timeout_ms))?;

            Ok(RawResponse::new(
                status,
                String::from_utf8_lossy(&body_bytes).into_owned(),
            ))
        })
    }
}

/// Provider handing out one fresh `ReqwestTransport` per case.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestProvider;

impl ReqwestProvider {
    /// Creates the provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TransportProvider for ReqwestProvider {
    type Transport = ReqwestTransport;

    fn create(&self, timeout: Duration) -> Result<ReqwestTransport, TransportError> {
        ReqwestTransport::new(timeout)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Post),
            Method::POST
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Put),
            Method::PUT
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Delete),
            Method::DELETE
        );
    }

    #[test]
    fn test_provider_creates_transport() {
        let transport = ReqwestProvider::new().create(Duration::from_secs(30));
        assert!(transport.is_ok());
        assert_eq!(transport.map(|t| t.timeout_ms).ok(), Some(30_000));
    }

    #[tokio::test]
    async fn test_rejected_header_value_is_unknown_failure() {
        use restcheck_domain::{RequestBody, RequestOutcome, TransportFailureKind};

        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
        let request = RequestSpec::new(HttpMethod::Post, "posts").with_body(
            RequestBody::with_content_type("application/json\r\nX: y", "{}"),
        );
        let url = Url::parse("http://127.0.0.1:9/posts").unwrap();

        let error = transport.send(url, &request).await.unwrap_err();
        assert!(matches!(error, TransportError::Other(_)), "{error:?}");
        assert!(matches!(
            error.into_outcome(),
            RequestOutcome::TransportFailure {
                kind: TransportFailureKind::Unknown,
                ..
            }
        ));
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let outer = std::io::Error::other(inner);
        assert!(error_chain(&outer).contains("refused"));
    }
}
