//! Case lifecycle state machine.
//!
//! A case moves `Idle → ClientAcquired → RequestBuilt → RequestSent →
//! Asserted → TornDown`. Failures short-cut forward, never backward:
//! a case whose precondition fails goes straight from `ClientAcquired` to
//! `Asserted`, and every state may jump to `TornDown` so the client is
//! always released.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a single case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaseState {
    /// Nothing has happened yet.
    #[default]
    Idle,
    /// A client handle is held.
    ClientAcquired,
    /// The request (path and serialized payload) is ready.
    RequestBuilt,
    /// The request was executed and an outcome captured.
    RequestSent,
    /// Checks have been evaluated.
    Asserted,
    /// The client handle has been released. Terminal.
    TornDown,
}

impl CaseState {
    /// Returns true if `next` is a legal successor of `self`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::ClientAcquired)
                | (Self::ClientAcquired, Self::RequestBuilt | Self::Asserted)
                | (Self::RequestBuilt, Self::RequestSent)
                | (Self::RequestSent, Self::Asserted)
                | (
                    Self::Idle
                        | Self::ClientAcquired
                        | Self::RequestBuilt
                        | Self::RequestSent
                        | Self::Asserted,
                    Self::TornDown
                )
        )
    }

    /// Returns true for the terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::TornDown)
    }

    /// Returns the state name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::ClientAcquired => "ClientAcquired",
            Self::RequestBuilt => "RequestBuilt",
            Self::RequestSent => "RequestSent",
            Self::Asserted => "Asserted",
            Self::TornDown => "TornDown",
        }
    }
}

impl fmt::Display for CaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_is_legal() {
        let path = [
            CaseState::Idle,
            CaseState::ClientAcquired,
            CaseState::RequestBuilt,
            CaseState::RequestSent,
            CaseState::Asserted,
            CaseState::TornDown,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_precondition_failure_skips_request() {
        assert!(CaseState::ClientAcquired.can_transition_to(CaseState::Asserted));
        assert!(!CaseState::Idle.can_transition_to(CaseState::RequestBuilt));
    }

    #[test]
    fn test_every_state_can_tear_down() {
        for state in [
            CaseState::Idle,
            CaseState::ClientAcquired,
            CaseState::RequestBuilt,
            CaseState::RequestSent,
            CaseState::Asserted,
        ] {
            assert!(state.can_transition_to(CaseState::TornDown));
        }
    }

    #[test]
    fn test_torn_down_is_terminal() {
        assert!(CaseState::TornDown.is_terminal());
        assert!(!CaseState::TornDown.can_transition_to(CaseState::Idle));
        assert!(!CaseState::TornDown.can_transition_to(CaseState::TornDown));
        assert!(!CaseState::Asserted.can_transition_to(CaseState::RequestSent));
    }
}
