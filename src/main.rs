mod core;
mod features;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::categories::models::Category;
use crate::features::categories::{
    routes as categories_routes, CategoryService, PgCategoryRepository,
};
use crate::features::genres::models::Genre;
use crate::features::genres::{routes as genres_routes, GenreService, PgGenreRepository};
use crate::shared::repository::{InMemoryRepository, Repository};
use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    let (category_repository, genre_repository): (
        Arc<dyn Repository<Category>>,
        Arc<dyn Repository<Genre>>,
    ) = match &config.database {
        Some(database_config) => {
            let pool = database::create_pool(database_config).await?;
            tracing::info!("Database connection pool created");

            tracing::info!("Running database migrations...");
            database::run_migrations(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
            tracing::info!("Database migrations completed successfully");

            (
                Arc::new(PgCategoryRepository::new(pool.clone())),
                Arc::new(PgGenreRepository::new(pool)),
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set, records are kept in memory and lost on exit");
            (
                Arc::new(InMemoryRepository::<Category>::new()),
                Arc::new(InMemoryRepository::<Genre>::new()),
            )
        }
    };

    let category_service = Arc::new(CategoryService::new(category_repository));
    let genre_service = Arc::new(GenreService::new(genre_repository));
    tracing::info!("Services initialized");

    let app = build_app(&config, category_service, genre_service);

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}

/// Simple health check endpoint
async fn health_check() -> axum::http::StatusCode {
    axum::http::StatusCode::OK
}

/// Assemble resource routes, docs and the shared middleware stack
fn build_app(
    config: &Config,
    category_service: Arc<CategoryService>,
    genre_service: Arc<GenreService>,
) -> Router {
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    Router::new()
        .merge(swagger)
        .merge(categories_routes::routes(category_service))
        .merge(genres_routes::routes(genre_service))
        .merge(health_route)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{AppConfig, SwaggerConfig};
    use axum::http::{header, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use base64::prelude::*;
    use serde_json::json;

    fn test_config(swagger_credentials: Option<(&str, &str)>) -> Config {
        Config {
            app: AppConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_allowed_origins: vec!["*".to_string()],
                max_request_body_size: 1024,
            },
            database: None,
            swagger: SwaggerConfig {
                username: swagger_credentials.map(|(user, _)| user.to_string()),
                password: swagger_credentials.map(|(_, pass)| pass.to_string()),
                title: "Catalog API".to_string(),
                version: "0.1.0".to_string(),
                description: "Test".to_string(),
            },
        }
    }

    fn test_server(config: &Config) -> TestServer {
        let app = build_app(
            config,
            Arc::new(CategoryService::new(Arc::new(
                InMemoryRepository::<Category>::new(),
            ))),
            Arc::new(GenreService::new(Arc::new(
                InMemoryRepository::<Genre>::new(),
            ))),
        );
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_health_and_request_id() {
        let server = test_server(&test_config(None));

        let response = server.get("/health").await;

        response.assert_status_ok();
        let request_id = response.header("x-request-id");
        assert!(uuid::Uuid::parse_str(request_id.to_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_resources_are_mounted_side_by_side() {
        let server = test_server(&test_config(None));

        server
            .post("/api/categories")
            .json(&json!({ "name": "Test Category" }))
            .await
            .assert_status(StatusCode::CREATED);

        server.get("/api/genres").await.assert_json(&json!([]));

        let body: serde_json::Value = server.get("/api/categories").await.json();
        assert_eq!(body.as_array().map(Vec::len), Some(1));
        assert_eq!(body[0]["name"], "Test Category");
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let server = test_server(&test_config(None));

        server
            .post("/api/categories")
            .json(&json!({ "name": "a".repeat(4096) }))
            .await
            .assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let server = test_server(&test_config(None));

        let response = server.get("/api-docs/openapi.json").await;

        response.assert_status_ok();
        response.assert_json_contains(&json!({ "info": { "title": "Catalog API" } }));
    }

    #[tokio::test]
    async fn test_openapi_document_requires_configured_credentials() {
        let server = test_server(&test_config(Some(("admin", "secret"))));

        server
            .get("/api-docs/openapi.json")
            .await
            .assert_status_unauthorized();

        let value = format!("Basic {}", BASE64_STANDARD.encode("admin:secret"));
        server
            .get("/api-docs/openapi.json")
            .add_header(header::AUTHORIZATION, HeaderValue::from_str(&value).unwrap())
            .await
            .assert_status_ok();
    }
}
