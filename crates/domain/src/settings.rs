//! Harness settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};

/// Default remote API.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com/";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of read-only cases allowed in flight at once.
pub const DEFAULT_MAX_CONCURRENT_READS: usize = 4;

/// Settings for one harness run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessSettings {
    /// Base address every request path is resolved against.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Upper bound on concurrently running read-only cases.
    pub max_concurrent_reads: usize,
    /// Echo response bodies of each case for diagnostics.
    pub echo_bodies: bool,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_concurrent_reads: DEFAULT_MAX_CONCURRENT_READS,
            echo_bodies: false,
        }
    }
}

impl HarnessSettings {
    /// Returns the timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parses the base URL, ensuring a trailing slash so relative paths
    /// resolve beneath it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBaseUrl` if the URL does not parse or is
    /// not `http`/`https`.
    pub fn base_url(&self) -> DomainResult<Url> {
        normalize_base_url(&self.base_url)
    }

    /// Validates all settings.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> DomainResult<()> {
        self.base_url()?;
        if self.timeout_secs == 0 {
            return Err(DomainError::InvalidSettings(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if self.max_concurrent_reads == 0 {
            return Err(DomainError::InvalidSettings(
                "max concurrent reads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parses a base URL and appends a trailing `/` to its path if missing.
///
/// # Errors
///
/// Returns `DomainError::InvalidBaseUrl` on parse failure or a non-HTTP scheme.
pub fn normalize_base_url(raw: &str) -> DomainResult<Url> {
    let mut url =
        Url::parse(raw.trim()).map_err(|e| DomainError::InvalidBaseUrl(format!("{e}: {raw}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DomainError::InvalidBaseUrl(format!(
            "scheme must be http or https: {raw}"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
