//! User repository

use anyhow::Result;
use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use sqlx::PgPool;
use tracing::info;

use crate::models::{NewUser, UpdateUser, User, UserWithRoles};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user, hashing the password before storage
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        info!("Creating new user: {}", new_user.email);

        let password_hash = hash_password(&new_user.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash) \
             VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// List all users with their role names
    pub async fn find_all_with_roles(&self) -> Result<Vec<UserWithRoles>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        let rows: Vec<(i64, String)> = sqlx::query_as(
            "SELECT ur.user_id, r.name \
             FROM user_roles ur \
             JOIN roles r ON r.id = ur.role_id \
             ORDER BY ur.user_id, r.id",
        )
        .fetch_all(&self.pool)
        .await?;

        let result = users
            .into_iter()
            .map(|user| {
                let roles = rows
                    .iter()
                    .filter(|(user_id, _)| *user_id == user.id)
                    .map(|(_, name)| name.clone())
                    .collect();
                UserWithRoles { user, roles }
            })
            .collect();

        Ok(result)
    }

    /// Check whether an email is already taken, optionally excluding one
    /// user (for updates)
    pub async fn email_exists(&self, email: &str, exclude_id: Option<i64>) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Apply a partial update; the password is only re-hashed when a new
    /// one is supplied. Returns `None` when the user doesn't exist.
    pub async fn update(&self, id: i64, changes: &UpdateUser) -> Result<Option<User>> {
        let Some(mut user) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        user.apply(changes);
        if let Some(password) = &changes.password {
            user.password_hash = hash_password(password)?;
        }

        let updated = sqlx::query_as::<_, User>(&format!(
            "UPDATE users \
             SET name = $1, email = $2, password_hash = $3, updated_at = NOW() \
             WHERE id = $4 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        info!("Updated user {}", id);
        Ok(Some(updated))
    }

    /// Delete a user. Returns false when no row matched.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        if result.rows_affected() > 0 {
            info!("Deleted user {}", id);
        }
        Ok(result.rows_affected() > 0)
    }

    /// Replace the user's role assignment set with exactly the given ids
    pub async fn sync_roles(&self, user_id: i64, role_ids: &[i64]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        for role_id in role_ids {
            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
                .bind(user_id)
                .bind(role_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!("Synced {} role(s) for user {}", role_ids.len(), user_id);
        Ok(())
    }

    /// Verify a user's password against the stored hash
    pub fn verify_password(&self, user: &User, password: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

        let argon2 = Argon2::default();
        Ok(argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

/// Hash a plaintext password with argon2
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_verifies_and_salts() {
        let hash = hash_password("12345678").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(Argon2::default()
            .verify_password(b"12345678", &parsed)
            .is_ok());
        assert!(Argon2::default()
            .verify_password(b"wrong-password", &parsed)
            .is_err());

        // Salted: same input, different hash
        let other = hash_password("12345678").unwrap();
        assert_ne!(hash, other);
    }
}
