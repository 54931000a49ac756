// User accounts: salted password digests and profile CRUD.

use crate::models::UserProfile;
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::Row;
use sqlx::sqlite::SqlitePool;
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum UserRepoError {
    #[error("Username already exists")]
    UsernameTaken,
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

pub struct UserRepo {
    pool: SqlitePool,
}

impl UserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, password), fields(repo = "user", operation = "create_user"))]
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, UserRepoError> {
        let hash = hash_password(password);
        let now = chrono::Utc::now().timestamp_millis();
        let res = sqlx::query(
            "INSERT INTO users (username, email, password, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(username)
        .bind(email)
        .bind(&hash)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;
        Ok(UserProfile {
            id: res.last_insert_rowid(),
            username: username.to_string(),
            email: email.to_string(),
            theme_color: "#38bdf8".to_string(),
        })
    }

    /// Verify credentials; None for unknown user or wrong password (the two
    /// cases are not distinguished to the caller).
    #[instrument(skip(self, password), fields(repo = "user", operation = "authenticate"))]
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserProfile>, UserRepoError> {
        let row = sqlx::query(
            "SELECT id, username, email, password, theme_color FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let stored: String = row.try_get("password")?;
        if !verify_password(password, &stored) {
            return Ok(None);
        }
        Ok(Some(profile_from_row(&row)?))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<UserProfile>, UserRepoError> {
        let row = sqlx::query(
            "SELECT id, username, email, password, theme_color FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| profile_from_row(&r)).transpose()
    }

    #[instrument(skip(self), fields(repo = "user", operation = "update_profile"))]
    pub async fn update_profile(
        &self,
        id: i64,
        username: &str,
        email: &str,
        theme_color: &str,
    ) -> Result<(), UserRepoError> {
        sqlx::query("UPDATE users SET username = $1, email = $2, theme_color = $3 WHERE id = $4")
            .bind(username)
            .bind(email)
            .bind(theme_color)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_unique_violation)?;
        Ok(())
    }

    /// Change password after verifying the current one. Returns false when
    /// the current password does not match (nothing is written).
    #[instrument(skip(self, current_password, new_password), fields(repo = "user", operation = "change_password"))]
    pub async fn change_password(
        &self,
        id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<bool, UserRepoError> {
        let row = sqlx::query("SELECT password FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(false);
        };
        let stored: String = row.try_get("password")?;
        if !verify_password(current_password, &stored) {
            return Ok(false);
        }
        sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
            .bind(hash_password(new_password))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(true)
    }

    /// Remove the account and everything it owns in one transaction.
    #[instrument(skip(self), fields(repo = "user", operation = "delete_account"))]
    pub async fn delete_account(&self, id: i64) -> Result<(), UserRepoError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM plans WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

fn profile_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<UserProfile, UserRepoError> {
    Ok(UserProfile {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        theme_color: row.try_get("theme_color")?,
    })
}

fn map_unique_violation(e: sqlx::Error) -> UserRepoError {
    let unique = e
        .as_database_error()
        .is_some_and(|db| matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation));
    if unique {
        UserRepoError::UsernameTaken
    } else {
        UserRepoError::Db(e)
    }
}

/// Stored as "salt$digest", both lowercase hex. Digest = SHA-256(salt_hex ||
/// password). Credential hardening is explicitly out of scope; the format
/// only needs to round-trip verify.
fn hash_password(password: &str) -> String {
    let salt: [u8; 16] = rand::rng().random();
    let salt_hex = hex(&salt);
    let digest = digest_hex(&salt_hex, password);
    format!("{}${}", salt_hex, digest)
}

fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt_hex, digest)) => digest_hex(salt_hex, password) == digest,
        None => false,
    }
}

fn digest_hex(salt_hex: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(password.as_bytes());
    hex(&hasher.finalize())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trips() {
        let stored = hash_password("hunter2");
        assert!(verify_password("hunter2", &stored));
        assert!(!verify_password("hunter3", &stored));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        assert_ne!(hash_password("secret"), hash_password("secret"));
    }

    #[test]
    fn malformed_stored_value_never_verifies() {
        assert!(!verify_password("anything", "no-dollar-separator"));
        assert!(!verify_password("anything", ""));
    }
}
