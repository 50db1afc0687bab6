//! Application intake and review routes

use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::pengajuan::handlers::{self, IntakeState};
use crate::features::pengajuan::services::PengajuanService;
use crate::modules::notify::WebhookClient;

/// Public intake route
pub fn public_routes(service: Arc<PengajuanService>, webhook: Arc<WebhookClient>) -> Router {
    Router::new()
        .route("/api/pengajuan", post(handlers::submit_pengajuan))
        .with_state(IntakeState { service, webhook })
}

/// Admin review routes, nested under `/api/admin` behind the auth middleware
pub fn admin_routes(service: Arc<PengajuanService>) -> Router {
    Router::new()
        .route("/pengajuan", get(handlers::list_pengajuan))
        .route(
            "/pengajuan/{id}",
            get(handlers::get_pengajuan).delete(handlers::delete_pengajuan),
        )
        .route(
            "/pengajuan/{id}/status",
            patch(handlers::update_pengajuan_status),
        )
        .with_state(service)
}
