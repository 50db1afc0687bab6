//! Dashboard routes

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::dashboard::handlers;
use crate::features::dashboard::services::DashboardService;

/// Admin dashboard routes, nested under `/api/admin` behind the auth middleware
pub fn admin_routes(service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/dashboard/stats", get(handlers::get_stats))
        .with_state(service)
}
