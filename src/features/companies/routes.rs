use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::companies::handlers;
use crate::features::companies::services::CompanyService;

/// Create routes for the companies feature
pub fn routes(service: Arc<CompanyService>) -> Router {
    Router::new()
        .route(
            "/api/companies/",
            get(handlers::list_companies).post(handlers::create_company),
        )
        .route(
            "/api/companies/{id}/",
            get(handlers::get_company)
                .put(handlers::replace_company)
                .patch(handlers::patch_company)
                .delete(handlers::delete_company),
        )
        .with_state(service)
}
