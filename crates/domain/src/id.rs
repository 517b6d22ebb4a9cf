//! Identifier types.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// Identifier of a remote resource (a post or a comment).
///
/// Always strictly positive. Fixtures carry raw integers so that invalid
/// identifiers can be expressed; they only become a `ResourceId` after
/// validation, which happens before any request is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ResourceId(u64);

impl ResourceId {
    /// Validates a raw identifier.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidIdentifier` when `raw <= 0`.
    pub fn new(raw: i64) -> DomainResult<Self> {
        u64::try_from(raw)
            .ok()
            .filter(|id| *id > 0)
            .map(Self)
            .ok_or(DomainError::InvalidIdentifier(raw))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Generates a new run identifier.
///
/// UUID v7 includes timestamp information, so case reports sort by start time.
#[must_use]
pub fn generate_run_id() -> Uuid {
    Uuid::now_v7()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_positive_id_is_accepted() {
        let id = ResourceId::new(9).unwrap();
        assert_eq!(id.get(), 9);
        assert_eq!(id.to_string(), "9");
    }

    #[test]
    fn test_non_positive_ids_are_rejected() {
        for raw in [0, -1, -42, i64::MIN] {
            assert_eq!(
                ResourceId::new(raw),
                Err(DomainError::InvalidIdentifier(raw))
            );
        }
    }

    #[test]
    fn test_deserialize_rejects_zero() {
        assert!(serde_json::from_str::<ResourceId>("0").is_err());
        assert_eq!(serde_json::from_str::<ResourceId>("3").unwrap().get(), 3);
    }

    #[test]
    fn test_run_id_uniqueness() {
        assert_ne!(generate_run_id(), generate_run_id());
    }
}
