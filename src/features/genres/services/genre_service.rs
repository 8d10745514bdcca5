use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::genres::dtos::{GenreChanges, GenreResponseDto};
use crate::features::genres::models::Genre;
use crate::shared::repository::{self, Repository};

/// Service for genre operations
pub struct GenreService {
    repository: Arc<dyn Repository<Genre>>,
}

impl GenreService {
    pub fn new(repository: Arc<dyn Repository<Genre>>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> Result<Vec<GenreResponseDto>> {
        let genres = self.repository.list().await?;
        Ok(genres.into_iter().map(Into::into).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<GenreResponseDto> {
        self.find_live(id).await.map(Into::into)
    }

    /// Create a genre; `is_active` defaults to true
    pub async fn create(&self, changes: GenreChanges) -> Result<GenreResponseDto> {
        let now = repository::now();
        let genre = Genre {
            id: Uuid::new_v4(),
            name: changes.name,
            is_active: changes.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        self.repository.insert(&genre).await?;

        tracing::info!("Genre created: id={}, name={:?}", genre.id, genre.name);

        Ok(genre.into())
    }

    pub async fn update(&self, id: Uuid, changes: GenreChanges) -> Result<GenreResponseDto> {
        let mut genre = self.find_live(id).await?;

        genre.name = changes.name;
        if let Some(is_active) = changes.is_active {
            genre.is_active = is_active;
        }
        genre.updated_at = repository::now();

        if !self.repository.save(&genre).await? {
            return Err(not_found(id));
        }

        tracing::info!("Genre updated: id={}", genre.id);

        Ok(genre.into())
    }

    /// Soft delete a genre
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut genre = self.find_live(id).await?;

        let now = repository::now();
        genre.updated_at = now;
        genre.deleted_at = Some(now);

        if !self.repository.save(&genre).await? {
            return Err(not_found(id));
        }

        tracing::info!("Genre deleted: id={}", genre.id);

        Ok(())
    }

    async fn find_live(&self, id: Uuid) -> Result<Genre> {
        self.repository
            .find(id)
            .await?
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Genre with id {} not found", id))
}
