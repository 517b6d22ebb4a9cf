//! Per-case client handle.
//!
//! A `ClientHandle` owns one transport together with the base address and
//! timeout it was created with; both are fixed for the handle's lifetime.
//! A `ClientSlot` is the optional holder a case keeps it in, so "no client"
//! is a state that has to be checked rather than a null to stumble on.

use std::time::Duration;

use restcheck_domain::DomainError;
use restcheck_domain::settings::normalize_base_url;
use tracing::debug;
use url::Url;

use crate::error::ApplicationResult;
use crate::ports::{HttpTransport, TransportProvider};

/// A configured transport bound to one base address.
#[derive(Debug)]
pub struct ClientHandle<T> {
    base_url: Url,
    timeout: Duration,
    transport: T,
}

impl<T: HttpTransport> ClientHandle<T> {
    /// Acquires a new handle from `provider`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base address is not an absolute `http(s)` URL,
    /// the timeout is zero, or the provider cannot build a transport.
    pub fn acquire<P>(provider: &P, base_address: &str, timeout: Duration) -> ApplicationResult<Self>
    where
        P: TransportProvider<Transport = T>,
    {
        let base_url = normalize_base_url(base_address)?;
        if timeout.is_zero() {
            return Err(DomainError::InvalidSettings(
                "timeout must be greater than zero".to_string(),
            )
            .into());
        }
        let transport = provider.create(timeout)?;
        debug!(base_url = %base_url, ?timeout, "client acquired");
        Ok(Self::from_parts(base_url, timeout, transport))
    }

    /// Builds a handle from an already-validated base URL and transport.
    #[must_use]
    pub const fn from_parts(base_url: Url, timeout: Duration, transport: T) -> Self {
        Self {
            base_url,
            timeout,
            transport,
        }
    }
}

impl<T> ClientHandle<T> {
    /// Base address requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Timeout applied to every request.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }
}

/// Optional holder for a case's client handle.
#[derive(Debug)]
pub struct ClientSlot<T> {
    handle: Option<ClientHandle<T>>,
}

impl<T> Default for ClientSlot<T> {
    fn default() -> Self {
        Self { handle: None }
    }
}

impl<T> ClientSlot<T> {
    /// Creates an empty slot.
    #[must_use]
    pub const fn empty() -> Self {
        Self { handle: None }
    }

    /// Stores a handle, releasing any previous one first.
    pub fn fill(&mut self, handle: ClientHandle<T>) {
        self.release();
        self.handle = Some(handle);
    }

    /// Returns the held handle, if any.
    #[must_use]
    pub const fn get(&self) -> Option<&ClientHandle<T>> {
        self.handle.as_ref()
    }

    /// Returns true while a handle is held.
    #[must_use]
    pub const fn is_acquired(&self) -> bool {
        self.handle.is_some()
    }

    /// Releases the held handle.
    ///
    /// Idempotent: releasing an empty slot is a no-op. Returns whether a
    /// handle was actually released.
    pub fn release(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                debug!(base_url = %handle.base_url, "client released");
                drop(handle);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ApplicationError;
    use crate::ports::{RawResponse, TransportError, TransportFuture};
    use restcheck_domain::RequestSpec;

    struct NullTransport;

    impl HttpTransport for NullTransport {
        fn send<'a>(&'a self, _url: Url, _request: &'a RequestSpec) -> TransportFuture<'a> {
            Box::pin(async { Ok(RawResponse::new(200, "")) })
        }
    }

    struct NullProvider {
        fail: bool,
    }

    impl TransportProvider for NullProvider {
        type Transport = NullTransport;

        fn create(&self, _timeout: Duration) -> Result<NullTransport, TransportError> {
            if self.fail {
                Err(TransportError::Build("no tls backend".to_string()))
            } else {
                Ok(NullTransport)
            }
        }
    }

    #[test]
    fn test_acquire_fixes_base_and_timeout() {
        let handle = ClientHandle::acquire(
            &NullProvider { fail: false },
            "https://jsonplaceholder.typicode.com",
            Duration::from_secs(30),
        )
        .unwrap();
        assert_eq!(
            handle.base_url().as_str(),
            "https://jsonplaceholder.typicode.com/"
        );
        assert_eq!(handle.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_acquire_rejects_bad_inputs() {
        let provider = NullProvider { fail: false };
        assert!(matches!(
            ClientHandle::acquire(&provider, "not a url", Duration::from_secs(1)),
            Err(ApplicationError::Domain(DomainError::InvalidBaseUrl(_)))
        ));
        assert!(matches!(
            ClientHandle::acquire(&provider, "http://localhost/", Duration::ZERO),
            Err(ApplicationError::Domain(DomainError::InvalidSettings(_)))
        ));
        assert!(matches!(
            ClientHandle::acquire(
                &NullProvider { fail: true },
                "http://localhost/",
                Duration::from_secs(1)
            ),
            Err(ApplicationError::Transport(TransportError::Build(_)))
        ));
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut slot = ClientSlot::empty();
        assert!(!slot.release());

        let handle = ClientHandle::acquire(
            &NullProvider { fail: false },
            "http://localhost/",
            Duration::from_secs(1),
        )
        .unwrap();
        slot.fill(handle);
        assert!(slot.is_acquired());
        assert!(slot.release());
        assert!(!slot.release());
        assert!(slot.get().is_none());
    }
}
