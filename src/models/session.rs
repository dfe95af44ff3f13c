use chrono::{DateTime, Utc};
use serde::Serialize;

use super::user::Role;

/// User id reported for the built-in administrator, who has no `users` row.
pub const BUILTIN_ADMIN_ID: i32 = 0;

/// A logged-in principal, resolved from a bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    #[serde(skip_serializing)]
    pub token: String,
    /// `None` for the built-in administrator.
    #[serde(skip_serializing)]
    pub user_id: Option<i32>,
    pub username: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// Public view of the current principal, as returned by `/api/auth/me`.
#[derive(Debug, Serialize)]
pub struct Principal {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn principal(&self) -> Principal {
        Principal {
            id: self.user_id.unwrap_or(BUILTIN_ADMIN_ID),
            username: self.username.clone(),
            role: self.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(user_id: Option<i32>, role: Role, expires_in: Duration) -> Session {
        Session {
            token: "token".to_string(),
            user_id,
            username: "xueling".to_string(),
            role,
            expires_at: Utc::now() + expires_in,
        }
    }

    #[test]
    fn test_builtin_admin_principal() {
        let admin = session(None, Role::Admin, Duration::hours(1));
        assert!(admin.is_admin());

        let principal = admin.principal();
        assert_eq!(principal.id, BUILTIN_ADMIN_ID);
        assert_eq!(principal.role, Role::Admin);
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        assert!(session(Some(1), Role::User, Duration::seconds(-1)).is_expired(now));
        assert!(!session(Some(1), Role::User, Duration::hours(1)).is_expired(now));
    }

    #[test]
    fn test_session_serialization_hides_token() {
        let json = serde_json::to_value(session(Some(4), Role::User, Duration::hours(1)))
            .expect("Failed to serialize session");
        assert!(json.get("token").is_none());
        assert!(json.get("user_id").is_none());
        assert_eq!(json["role"], "user");
    }
}
