use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::features::categories::models::Category;
use crate::shared::validation;

/// Request body for creating or updating a category.
///
/// Fields stay untyped JSON until validated so that a wrong type is reported
/// as a field error instead of a body parse failure.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CategoryPayloadDto {
    #[serde(default, deserialize_with = "validation::trimmed")]
    #[validate(required, custom(function = "crate::shared::validation::name"))]
    #[schema(value_type = String, max_length = 255, example = "Documentary")]
    pub name: Option<Value>,

    /// `null` or `""` clears the description
    #[serde(default, deserialize_with = "validation::present")]
    #[validate(custom(function = "crate::shared::validation::nullable_string"))]
    #[schema(value_type = Option<String>)]
    pub description: Option<Value>,

    /// Defaults to `true` on create
    #[serde(default, deserialize_with = "validation::trimmed")]
    #[validate(custom(function = "crate::shared::validation::boolean"))]
    #[schema(value_type = Option<bool>)]
    pub is_active: Option<Value>,
}

/// Validated category input
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryChanges {
    pub name: String,
    /// `None` leaves the description untouched, `Some(None)` clears it
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl CategoryPayloadDto {
    /// Validate the payload and convert it into typed changes
    pub fn validated(self) -> Result<CategoryChanges> {
        self.validate()?;

        Ok(CategoryChanges {
            name: self
                .name
                .as_ref()
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_default(),
            description: self
                .description
                .as_ref()
                .map(validation::non_empty_string),
            is_active: self.is_active.as_ref().and_then(validation::as_boolean),
        })
    }
}

/// Response DTO for category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}
