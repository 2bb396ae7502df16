use crate::domain::{models::resource::Resource, ports::ResourceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteResourceRepo {
    pool: SqlitePool,
}

impl SqliteResourceRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceRepository for SqliteResourceRepo {
    async fn create(&self, resource: &Resource) -> Result<Resource, AppError> {
        sqlx::query_as::<_, Resource>(
            "INSERT INTO resources (id, kind, name, price, max_guests, price_per_plate, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&resource.id).bind(resource.kind).bind(&resource.name).bind(resource.price)
            .bind(resource.max_guests).bind(resource.price_per_plate).bind(resource.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Resource>, AppError> {
        sqlx::query_as::<_, Resource>("SELECT * FROM resources WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self) -> Result<Vec<Resource>, AppError> {
        sqlx::query_as::<_, Resource>("SELECT * FROM resources ORDER BY kind, price ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
