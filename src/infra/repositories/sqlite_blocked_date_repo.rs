use crate::domain::{models::blocked_date::BlockedDate, models::resource::ResourceKind, ports::BlockedDateRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteBlockedDateRepo {
    pool: SqlitePool,
}

impl SqliteBlockedDateRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlockedDateRepository for SqliteBlockedDateRepo {
    async fn create(&self, blocked: &BlockedDate) -> Result<BlockedDate, AppError> {
        sqlx::query_as::<_, BlockedDate>(
            "INSERT INTO blocked_dates (id, date, kind, reason, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&blocked.id).bind(blocked.date).bind(blocked.kind).bind(&blocked.reason).bind(blocked.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM blocked_dates WHERE id = ?").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Blocked date not found".into())); }
        Ok(())
    }
    async fn list(&self, kind: Option<ResourceKind>) -> Result<Vec<BlockedDate>, AppError> {
        match kind {
            Some(kind) => {
                sqlx::query_as::<_, BlockedDate>("SELECT * FROM blocked_dates WHERE kind = ? ORDER BY date ASC").bind(kind).fetch_all(&self.pool).await.map_err(AppError::Database)
            }
            None => {
                sqlx::query_as::<_, BlockedDate>("SELECT * FROM blocked_dates ORDER BY date ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
            }
        }
    }
}
