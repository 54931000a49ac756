// Plan documents. Every query is scoped to the owning user; a plan id from
// another account behaves like a missing row.

use crate::models::Plan;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use tracing::instrument;

/// Default document for a freshly created plan: an empty graph.
pub const EMPTY_GRAPH: &str = r#"{"nodes":[],"edges":[]}"#;

pub struct PlanRepo {
    pool: SqlitePool,
}

impl PlanRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self), fields(repo = "plan", operation = "list_for_user"))]
    pub async fn list_for_user(&self, user_id: i64) -> anyhow::Result<Vec<Plan>> {
        let rows = sqlx::query(
            "SELECT id, user_id, name, data, created_at, updated_at
             FROM plans WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(plan_from_row).collect()
    }

    #[instrument(skip(self), fields(repo = "plan", operation = "create"))]
    pub async fn create(&self, user_id: i64, name: &str) -> anyhow::Result<Plan> {
        let now = chrono::Utc::now().timestamp_millis();
        let res = sqlx::query(
            "INSERT INTO plans (user_id, name, data, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $4)",
        )
        .bind(user_id)
        .bind(name)
        .bind(EMPTY_GRAPH)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(Plan {
            id: res.last_insert_rowid(),
            user_id,
            name: name.to_string(),
            data: EMPTY_GRAPH.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get(&self, user_id: i64, id: i64) -> anyhow::Result<Option<Plan>> {
        let row = sqlx::query(
            "SELECT id, user_id, name, data, created_at, updated_at
             FROM plans WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(plan_from_row).transpose()
    }

    /// Replace the document blob. Returns false when the plan does not exist
    /// or belongs to someone else.
    #[instrument(skip(self, data), fields(repo = "plan", operation = "save_data"))]
    pub async fn save_data(&self, user_id: i64, id: i64, data: &str) -> anyhow::Result<bool> {
        let now = chrono::Utc::now().timestamp_millis();
        let res = sqlx::query(
            "UPDATE plans SET data = $1, updated_at = $2 WHERE id = $3 AND user_id = $4",
        )
        .bind(data)
        .bind(now)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(repo = "plan", operation = "delete"))]
    pub async fn delete(&self, user_id: i64, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM plans WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

fn plan_from_row(row: &SqliteRow) -> anyhow::Result<Plan> {
    Ok(Plan {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        data: row.try_get("data")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
