use std::sync::Arc;

use axum_test::TestServer;
use fake::faker::lorem::en::{Sentence, Word};
use fake::{Fake, Faker};
use sqlx::PgPool;

use crate::core::config::DatabaseConfig;
use crate::core::database;

use crate::features::categories::dtos::{CategoryChanges, CategoryResponseDto};
use crate::features::categories::models::Category;
use crate::features::categories::{routes as categories_routes, CategoryService};
use crate::features::genres::dtos::{GenreChanges, GenreResponseDto};
use crate::features::genres::models::Genre;
use crate::features::genres::{routes as genres_routes, GenreService};
use crate::shared::repository::InMemoryRepository;

/// Categories router over an empty in-memory store
pub fn category_server() -> (TestServer, Arc<CategoryService>) {
    let service = Arc::new(CategoryService::new(Arc::new(
        InMemoryRepository::<Category>::new(),
    )));
    let server = TestServer::new(categories_routes::routes(Arc::clone(&service))).unwrap();
    (server, service)
}

/// Genres router over an empty in-memory store
pub fn genre_server() -> (TestServer, Arc<GenreService>) {
    let service = Arc::new(GenreService::new(Arc::new(InMemoryRepository::<Genre>::new())));
    let server = TestServer::new(genres_routes::routes(Arc::clone(&service))).unwrap();
    (server, service)
}

/// Insert a category with random attributes
pub async fn seed_category(service: &CategoryService) -> CategoryResponseDto {
    service
        .create(CategoryChanges {
            name: Word().fake(),
            description: Some(Some(Sentence(3..8).fake())),
            is_active: Some(Faker.fake()),
        })
        .await
        .unwrap()
}

/// Insert a genre with random attributes
pub async fn seed_genre(service: &GenreService) -> GenreResponseDto {
    service
        .create(GenreChanges {
            name: Word().fake(),
            is_active: Some(Faker.fake()),
        })
        .await
        .unwrap()
}

/// Migrated pool for the database named by `DATABASE_URL`. Returns `None`
/// when no database is configured so PostgreSQL tests can be skipped.
pub async fn pg_pool() -> Option<PgPool> {
    let _ = dotenvy::dotenv();
    let config = DatabaseConfig::from_env().unwrap()?;
    let pool = database::create_pool(&config).await.unwrap();
    database::run_migrations(&pool).await.unwrap();
    Some(pool)
}
