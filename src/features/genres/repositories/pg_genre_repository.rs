use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::genres::models::Genre;
use crate::shared::repository::Repository;

/// PostgreSQL-backed genre storage
pub struct PgGenreRepository {
    pool: PgPool,
}

impl PgGenreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Genre> for PgGenreRepository {
    async fn list(&self) -> Result<Vec<Genre>> {
        sqlx::query_as::<_, Genre>(
            r#"
            SELECT id, name, is_active, created_at, updated_at, deleted_at
            FROM genres
            WHERE deleted_at IS NULL
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list genres: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find(&self, id: Uuid) -> Result<Option<Genre>> {
        sqlx::query_as::<_, Genre>(
            r#"
            SELECT id, name, is_active, created_at, updated_at, deleted_at
            FROM genres
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get genre by id: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_with_trashed(&self, id: Uuid) -> Result<Option<Genre>> {
        sqlx::query_as::<_, Genre>(
            r#"
            SELECT id, name, is_active, created_at, updated_at, deleted_at
            FROM genres
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get genre by id: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn insert(&self, genre: &Genre) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO genres (id, name, is_active, created_at, updated_at, deleted_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(genre.id)
        .bind(&genre.name)
        .bind(genre.is_active)
        .bind(genre.created_at)
        .bind(genre.updated_at)
        .bind(genre.deleted_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create genre: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(())
    }

    async fn save(&self, genre: &Genre) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE genres
            SET name = $2, is_active = $3, updated_at = $4, deleted_at = $5
            WHERE id = $1
            "#,
        )
        .bind(genre.id)
        .bind(&genre.name)
        .bind(genre.is_active)
        .bind(genre.updated_at)
        .bind(genre.deleted_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update genre: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(result.rows_affected() > 0)
    }
}
