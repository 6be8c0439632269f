//! User profile domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier of a user account.
pub type UserId = i64;

/// The authenticated user's profile, as returned by the backend.
///
/// Owned exclusively by the session manager: it is only set after a
/// successful login or token-validation round trip, and reset to `None`
/// on logout or invalid-token detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_roundtrip() {
        let json = r#"{"id":7,"email":"ada@example.com","created_at":"2026-01-05T12:00:00Z"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.email, "ada@example.com");

        let back = serde_json::to_string(&user).unwrap();
        let again: User = serde_json::from_str(&back).unwrap();
        assert_eq!(again, user);
    }
}
