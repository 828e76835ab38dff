use serde::{Deserialize, Serialize};

/// Why a requester may, or may not, mutate a state key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessDecision {
    /// The requester owns the key.
    SelfOwned,
    /// A recorded grant covers the requester.
    Granted,
    /// Neither ownership nor a grant applies.
    Denied,
}

impl AccessDecision {
    /// Returns `true` unless the decision is `Denied`.
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Self::Denied)
    }
}

/// Result of a successful grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrantOutcome {
    /// A new grant was recorded.
    Recorded,
    /// The grantee already held this grant; nothing changed.
    AlreadyGranted,
}
