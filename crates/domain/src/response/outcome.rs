//! Normalized result of a single HTTP call.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::testing::FailureKind;

/// Sub-classification of transport-level failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportFailureKind {
    /// Connection could not be established or was dropped (refused, DNS, reset).
    Connection,
    /// Anything else the transport reported.
    Unknown,
}

impl TransportFailureKind {
    /// Returns the kind as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connection => "connection",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TransportFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one request: a status and buffered body, or a classified failure.
///
/// Every failure mode of a call is a value of this type; nothing is raised
/// past the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RequestOutcome {
    /// The round trip completed, whatever the status code.
    Success {
        /// HTTP status code
        status: u16,
        /// Entire response body as text
        body: String,
        /// Time from dispatch until the body was fully read
        #[serde(with = "duration_millis")]
        duration: Duration,
    },
    /// The transport failed before a response was obtained.
    TransportFailure {
        /// Failure sub-kind
        kind: TransportFailureKind,
        /// Transport error message
        message: String,
    },
    /// The call exceeded the configured timeout.
    Timeout {
        /// Description of the timeout
        message: String,
    },
    /// The request target was malformed; no call was attempted.
    InvalidTarget {
        /// Description of the problem
        message: String,
    },
}

impl RequestOutcome {
    /// Creates a `Success` outcome.
    #[must_use]
    pub fn success(status: u16, body: impl Into<String>, duration: Duration) -> Self {
        Self::Success {
            status,
            body: body.into(),
            duration,
        }
    }

    /// Creates a connection-level `TransportFailure`.
    #[must_use]
    pub fn connection_failure(message: impl Into<String>) -> Self {
        Self::TransportFailure {
            kind: TransportFailureKind::Connection,
            message: message.into(),
        }
    }

    /// Creates an unclassified `TransportFailure`.
    #[must_use]
    pub fn unknown_failure(message: impl Into<String>) -> Self {
        Self::TransportFailure {
            kind: TransportFailureKind::Unknown,
            message: message.into(),
        }
    }

    /// Creates a `Timeout` outcome.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates an `InvalidTarget` outcome.
    #[must_use]
    pub fn invalid_target(message: impl Into<String>) -> Self {
        Self::InvalidTarget {
            message: message.into(),
        }
    }

    /// Returns true if a response was received.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the status code if a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Success { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the response body if a response was received.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Success { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns the taxonomy kind for a failed outcome.
    #[must_use]
    pub const fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::TransportFailure { .. } => Some(FailureKind::TransportFailure),
            Self::Timeout { .. } => Some(FailureKind::Timeout),
            Self::InvalidTarget { .. } => Some(FailureKind::InvalidTarget),
        }
    }

    /// Returns the human-readable failure message, prefixed with its kind.
    #[must_use]
    pub fn failure_message(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::TransportFailure { kind, message } => {
                Some(format!("TransportFailure ({kind}): {message}"))
            }
            Self::Timeout { message } => Some(format!("Timeout: {message}")),
            Self::InvalidTarget { message } => Some(format!("InvalidTarget: {message}")),
        }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
