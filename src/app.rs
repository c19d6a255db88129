use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, http::StatusCode, routing::get, Router};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::core::config::AppConfig;
use crate::core::middleware;
use crate::features::categories::{routes as categories_routes, CategoryService};
use crate::features::companies::{routes as companies_routes, CompanyService};

/// Simple health check endpoint
async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Build the API routes backed by `pool`
pub fn api_routes(pool: PgPool) -> Router {
    let company_service = Arc::new(CompanyService::new(pool.clone()));
    tracing::info!("Company service initialized");

    let category_service = Arc::new(CategoryService::new(pool));
    tracing::info!("Category service initialized");

    Router::new()
        .route("/health", get(health_check))
        .merge(companies_routes::routes(company_service))
        .merge(categories_routes::routes(category_service))
}

/// Wrap a router with the shared middleware stack
pub fn with_middleware(router: Router, config: &AppConfig) -> Router {
    router
        .layer(DefaultBodyLimit::max(config.max_request_body_size))
        .layer(middleware::cors_layer(&config.cors_allowed_origins))
        .layer(
            ServiceBuilder::new()
                // Generate X-Request-Id using UUID v7 (or use client-provided one)
                .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(middleware::MakeSpanWithRequestId)
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                // Propagate X-Request-Id to response headers
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

/// Full application router as served by the binary (without Swagger UI)
pub fn build_app(pool: PgPool, config: &AppConfig) -> Router {
    with_middleware(api_routes(pool), config)
}
