use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::features::genres::models::Genre;
use crate::shared::validation;

/// Request body for creating or updating a genre
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct GenrePayloadDto {
    #[serde(default, deserialize_with = "validation::trimmed")]
    #[validate(required, custom(function = "crate::shared::validation::name"))]
    #[schema(value_type = String, max_length = 255, example = "Drama")]
    pub name: Option<Value>,

    /// Defaults to `true` on create
    #[serde(default, deserialize_with = "validation::trimmed")]
    #[validate(custom(function = "crate::shared::validation::boolean"))]
    #[schema(value_type = Option<bool>)]
    pub is_active: Option<Value>,
}

/// Validated genre input
#[derive(Debug, Clone, PartialEq)]
pub struct GenreChanges {
    pub name: String,
    pub is_active: Option<bool>,
}

impl GenrePayloadDto {
    pub fn validated(self) -> Result<GenreChanges> {
        self.validate()?;

        Ok(GenreChanges {
            name: self
                .name
                .as_ref()
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_default(),
            is_active: self.is_active.as_ref().and_then(validation::as_boolean),
        })
    }
}

/// Response DTO for genre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GenreResponseDto {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Genre> for GenreResponseDto {
    fn from(g: Genre) -> Self {
        Self {
            id: g.id,
            name: g.name,
            is_active: g.is_active,
            created_at: g.created_at,
            updated_at: g.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_rules() {
        let payload: GenrePayloadDto = serde_json::from_value(json!({})).unwrap();
        let errors = payload.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 1);
        assert_eq!(errors.field_errors()["name"][0].code, "required");

        let payload: GenrePayloadDto =
            serde_json::from_value(json!({ "name": "a".repeat(256), "is_active": "a" })).unwrap();
        let errors = payload.validate().unwrap_err();
        assert_eq!(errors.field_errors()["name"][0].code, "max");
        assert_eq!(errors.field_errors()["is_active"][0].code, "boolean");
    }

    #[test]
    fn test_validated_ignores_unknown_fields() {
        let payload: GenrePayloadDto = serde_json::from_value(json!({
            "name": "Drama",
            "description": "not a genre field",
            "is_active": 1
        }))
        .unwrap();

        assert_eq!(
            payload.validated().unwrap(),
            GenreChanges {
                name: "Drama".to_string(),
                is_active: Some(true),
            }
        );
    }
}
