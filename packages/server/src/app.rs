//! Application setup and router configuration.

use axum::extract::Extension;
use axum::routing::{delete, get, post};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::routes::{
    create_company, delete_company, health, list_companies, reset_companies, run_company,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
}

/// Build the router with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/companies", get(list_companies).post(create_company))
        .route("/companies/reset", post(reset_companies))
        .route("/companies/:id", delete(delete_company))
        .route("/run/:id", post(run_company))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
