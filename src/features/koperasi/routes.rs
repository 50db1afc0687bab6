//! Cooperative registry routes

use std::sync::Arc;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::features::koperasi::handlers;
use crate::features::koperasi::services::KoperasiService;

/// Public read-only routes: listing, export, map data, detail
pub fn public_routes(service: Arc<KoperasiService>) -> Router {
    Router::new()
        .route("/api/koperasi", get(handlers::list_koperasi))
        .route("/api/koperasi/export", get(handlers::export_koperasi))
        .route("/api/koperasi/peta", get(handlers::peta_koperasi))
        .route("/api/koperasi/{id}", get(handlers::get_koperasi))
        .with_state(service)
}

/// Admin management routes, nested under `/api/admin` behind the auth middleware
pub fn admin_routes(service: Arc<KoperasiService>) -> Router {
    Router::new()
        .route("/koperasi", post(handlers::create_koperasi))
        .route(
            "/koperasi/{id}",
            put(handlers::update_koperasi).delete(handlers::delete_koperasi),
        )
        .route(
            "/koperasi/{id}/status",
            patch(handlers::toggle_koperasi_status),
        )
        .with_state(service)
}
