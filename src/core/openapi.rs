use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::genres::{dtos as genres_dtos, handlers as genres_handlers};
use crate::shared::types::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories
        categories_handlers::list_categories,
        categories_handlers::get_category,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        // Genres
        genres_handlers::list_genres,
        genres_handlers::get_genre,
        genres_handlers::create_genre,
        genres_handlers::update_genre,
        genres_handlers::delete_genre,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            // Categories
            categories_dtos::CategoryPayloadDto,
            categories_dtos::CategoryResponseDto,
            // Genres
            genres_dtos::GenrePayloadDto,
            genres_dtos::GenreResponseDto,
        )
    ),
    tags(
        (name = "categories", description = "Categories (soft deleted, never removed)"),
        (name = "genres", description = "Genres (soft deleted, never removed)"),
    ),
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "API documentation for the category and genre catalog",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_resource_routes() {
        let doc = ApiDoc::openapi();

        for path in [
            "/api/categories",
            "/api/categories/{id}",
            "/api/genres",
            "/api/genres/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_info_modifier_overrides_info() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Custom".to_string(),
            version: "9.9.9".to_string(),
            description: "Custom docs".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Custom");
        assert_eq!(doc.info.version, "9.9.9");
        assert_eq!(doc.info.description.as_deref(), Some("Custom docs"));
    }
}
