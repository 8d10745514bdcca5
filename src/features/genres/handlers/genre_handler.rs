use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppPath};
use crate::features::genres::dtos::{GenrePayloadDto, GenreResponseDto};
use crate::features::genres::services::GenreService;
use crate::shared::types::ErrorResponse;

/// List all genres
#[utoipa::path(
    get,
    path = "/api/genres",
    responses(
        (status = 200, description = "List of genres", body = Vec<GenreResponseDto>),
    ),
    tag = "genres"
)]
pub async fn list_genres(
    State(service): State<Arc<GenreService>>,
) -> Result<Json<Vec<GenreResponseDto>>> {
    let genres = service.list().await?;
    Ok(Json(genres))
}

/// Get genre by id
#[utoipa::path(
    get,
    path = "/api/genres/{id}",
    params(
        ("id" = Uuid, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre found", body = GenreResponseDto),
        (status = 404, description = "Genre not found", body = ErrorResponse)
    ),
    tag = "genres"
)]
pub async fn get_genre(
    State(service): State<Arc<GenreService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<GenreResponseDto>> {
    let genre = service.get_by_id(id).await?;
    Ok(Json(genre))
}

/// Create a genre
#[utoipa::path(
    post,
    path = "/api/genres",
    request_body = GenrePayloadDto,
    responses(
        (status = 201, description = "Genre created", body = GenreResponseDto),
        (status = 400, description = "Malformed JSON body", body = ErrorResponse),
        (status = 422, description = "Validation error, keyed by field")
    ),
    tag = "genres"
)]
pub async fn create_genre(
    State(service): State<Arc<GenreService>>,
    AppJson(dto): AppJson<GenrePayloadDto>,
) -> Result<(StatusCode, Json<GenreResponseDto>)> {
    let changes = dto.validated()?;

    let genre = service.create(changes).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

/// Update a genre
#[utoipa::path(
    put,
    path = "/api/genres/{id}",
    params(
        ("id" = Uuid, Path, description = "Genre ID")
    ),
    request_body = GenrePayloadDto,
    responses(
        (status = 200, description = "Genre updated", body = GenreResponseDto),
        (status = 404, description = "Genre not found", body = ErrorResponse),
        (status = 422, description = "Validation error, keyed by field")
    ),
    tag = "genres"
)]
pub async fn update_genre(
    State(service): State<Arc<GenreService>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(dto): AppJson<GenrePayloadDto>,
) -> Result<Json<GenreResponseDto>> {
    let changes = dto.validated()?;

    let genre = service.update(id, changes).await?;
    Ok(Json(genre))
}

/// Delete a genre (soft delete)
#[utoipa::path(
    delete,
    path = "/api/genres/{id}",
    params(
        ("id" = Uuid, Path, description = "Genre ID")
    ),
    responses(
        (status = 204, description = "Genre deleted"),
        (status = 404, description = "Genre not found", body = ErrorResponse)
    ),
    tag = "genres"
)]
pub async fn delete_genre(
    State(service): State<Arc<GenreService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
