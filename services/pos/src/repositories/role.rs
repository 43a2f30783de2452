//! Role repository
//!
//! Roles are seeded outside this service; only reads and membership checks
//! are needed here.

use anyhow::Result;
use sqlx::PgPool;

/// Role repository
#[derive(Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check that every id in the slice references an existing role
    pub async fn all_exist(&self, ids: &[i64]) -> Result<bool> {
        if ids.is_empty() {
            return Ok(true);
        }

        let mut unique = ids.to_vec();
        unique.sort_unstable();
        unique.dedup();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM roles WHERE id = ANY($1)")
            .bind(&unique)
            .fetch_one(&self.pool)
            .await?;

        Ok(count as usize == unique.len())
    }

    /// Role names assigned to a user
    pub async fn names_for_user(&self, user_id: i64) -> Result<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT r.name \
             FROM user_roles ur \
             JOIN roles r ON r.id = ur.role_id \
             WHERE ur.user_id = $1 \
             ORDER BY r.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }
}
