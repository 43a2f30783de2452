//! User model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User entity. Deliberately not `Serialize`: the password hash must never
/// leave the service, so responses go through [`UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user creation payload; `password` is plaintext and hashed by the
/// repository before storage.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// User partial-update payload. A `None` field is left untouched; the
/// password is only re-hashed when a new one is supplied.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A user together with the names of its assigned roles
#[derive(Debug, Clone)]
pub struct UserWithRoles {
    pub user: User,
    pub roles: Vec<String>,
}

/// Serialized user shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserWithRoles> for UserResponse {
    fn from(value: UserWithRoles) -> Self {
        UserResponse {
            id: value.user.id,
            name: value.user.name,
            email: value.user.email,
            roles: value.roles,
            created_at: value.user.created_at,
            updated_at: value.user.updated_at,
        }
    }
}

impl User {
    /// Apply a partial update, leaving unsupplied fields unchanged. The
    /// password is handled separately by the repository since it needs
    /// hashing.
    pub fn apply(&mut self, changes: &UpdateUser) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(email) = &changes.email {
            self.email = email.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_apply_overwrites_only_supplied_fields() {
        let mut user = sample_user();
        user.apply(&UpdateUser {
            name: Some("Administrator".to_string()),
            ..Default::default()
        });

        assert_eq!(user.name, "Administrator");
        assert_eq!(user.email, "admin@example.com");
    }

    #[test]
    fn test_user_response_never_contains_password() {
        let with_roles = UserWithRoles {
            user: sample_user(),
            roles: vec!["admin".to_string()],
        };
        let response = UserResponse::from(with_roles);
        let json = serde_json::to_string(&response).unwrap();

        assert!(!json.contains("password"));
        assert!(json.contains("\"roles\":[\"admin\"]"));
    }
}
