//! Session state machine types.

use serde::{Deserialize, Serialize};

use crate::user::User;

/// Phase of the session lifecycle.
///
/// Transitions:
/// - `Anonymous -> Authenticating` on login start
/// - `Authenticating -> Authenticated` when both the credential exchange
///   and the profile fetch succeed
/// - `Authenticating -> Anonymous` on failure of either step
/// - `Authenticated -> Anonymous` on logout or forced invalidation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated,
}

/// Snapshot of the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: SessionPhase,
    /// Set only while `phase == Authenticated`.
    pub user: Option<User>,
    /// Message of the last failed login, cleared on the next attempt.
    pub error: Option<String>,
}

impl SessionState {
    /// The initial, signed-out state.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// True when a user profile is resolved and the session is valid.
    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated
    }

    /// True while a login attempt is in flight.
    pub fn is_authenticating(&self) -> bool {
        self.phase == SessionPhase::Authenticating
    }
}
