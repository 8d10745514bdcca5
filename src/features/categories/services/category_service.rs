use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{CategoryChanges, CategoryResponseDto};
use crate::features::categories::models::Category;
use crate::shared::repository::{self, Repository};

/// Service for category operations
pub struct CategoryService {
    repository: Arc<dyn Repository<Category>>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn Repository<Category>>) -> Self {
        Self { repository }
    }

    /// List all live categories
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = self.repository.list().await?;
        Ok(categories.into_iter().map(Into::into).collect())
    }

    /// Get category by id
    pub async fn get_by_id(&self, id: Uuid) -> Result<CategoryResponseDto> {
        self.find_live(id).await.map(Into::into)
    }

    /// Create a category, applying defaults for omitted fields
    pub async fn create(&self, changes: CategoryChanges) -> Result<CategoryResponseDto> {
        let now = repository::now();
        let category = Category {
            id: Uuid::new_v4(),
            name: changes.name,
            description: changes.description.flatten(),
            is_active: changes.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        self.repository.insert(&category).await?;

        tracing::info!(
            "Category created: id={}, name={:?}",
            category.id,
            category.name
        );

        Ok(category.into())
    }

    /// Update a category. Fields missing from `changes` keep their value.
    pub async fn update(&self, id: Uuid, changes: CategoryChanges) -> Result<CategoryResponseDto> {
        let mut category = self.find_live(id).await?;

        category.name = changes.name;
        if let Some(description) = changes.description {
            category.description = description;
        }
        if let Some(is_active) = changes.is_active {
            category.is_active = is_active;
        }
        category.updated_at = repository::now();

        if !self.repository.save(&category).await? {
            return Err(not_found(id));
        }

        tracing::info!("Category updated: id={}", category.id);

        Ok(category.into())
    }

    /// Soft delete a category
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut category = self.find_live(id).await?;

        let now = repository::now();
        category.updated_at = now;
        category.deleted_at = Some(now);

        if !self.repository.save(&category).await? {
            return Err(not_found(id));
        }

        tracing::info!("Category deleted: id={}", category.id);

        Ok(())
    }

    async fn find_live(&self, id: Uuid) -> Result<Category> {
        self.repository
            .find(id)
            .await?
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Category with id {} not found", id))
}
