use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers, models as auth_models};
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::koperasi::{
    dtos as koperasi_dtos, handlers as koperasi_handlers, models as koperasi_models,
};
use crate::features::locations::{dtos as locations_dtos, handlers as locations_handlers};
use crate::features::pengajuan::{
    dtos as pengajuan_dtos, handlers as pengajuan_handlers, models as pengajuan_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::login,
        auth_handlers::logout,
        auth_handlers::me,
        // Koperasi (public)
        koperasi_handlers::list_koperasi,
        koperasi_handlers::export_koperasi,
        koperasi_handlers::peta_koperasi,
        koperasi_handlers::get_koperasi,
        // Koperasi (admin)
        koperasi_handlers::create_koperasi,
        koperasi_handlers::update_koperasi,
        koperasi_handlers::toggle_koperasi_status,
        koperasi_handlers::delete_koperasi,
        // Pengajuan (public intake)
        pengajuan_handlers::submit_pengajuan,
        // Pengajuan (admin review)
        pengajuan_handlers::list_pengajuan,
        pengajuan_handlers::get_pengajuan,
        pengajuan_handlers::update_pengajuan_status,
        pengajuan_handlers::delete_pengajuan,
        // Lokasi
        locations_handlers::search_location,
        locations_handlers::reverse_location,
        // Dashboard
        dashboard_handlers::get_stats,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth_models::CurrentAdmin,
            auth_dtos::LoginRequestDto,
            auth_dtos::LoginResponseDto,
            auth_dtos::AdminProfileDto,
            ApiResponse<auth_dtos::LoginResponseDto>,
            ApiResponse<auth_dtos::AdminProfileDto>,
            // Koperasi
            koperasi_models::KoperasiStatus,
            koperasi_dtos::SaveKoperasiDto,
            koperasi_dtos::ToggleStatusDto,
            koperasi_dtos::KoperasiResponseDto,
            ApiResponse<koperasi_dtos::KoperasiResponseDto>,
            ApiResponse<Vec<koperasi_dtos::KoperasiResponseDto>>,
            // Pengajuan
            pengajuan_models::PengajuanStatus,
            pengajuan_dtos::SubmitPengajuanDto,
            pengajuan_dtos::UpdateStatusDto,
            pengajuan_dtos::PengajuanResponseDto,
            pengajuan_dtos::PengajuanDetailDto,
            pengajuan_dtos::DokumenDto,
            ApiResponse<pengajuan_dtos::PengajuanResponseDto>,
            ApiResponse<Vec<pengajuan_dtos::PengajuanResponseDto>>,
            ApiResponse<pengajuan_dtos::PengajuanDetailDto>,
            // Lokasi
            locations_dtos::LocationDto,
            ApiResponse<locations_dtos::LocationDto>,
            ApiResponse<Vec<locations_dtos::LocationDto>>,
            // Dashboard
            dashboard_dtos::DashboardStatsDto,
            dashboard_dtos::KecamatanStatDto,
            ApiResponse<dashboard_dtos::DashboardStatsDto>,
        )
    ),
    tags(
        (name = "auth", description = "Admin authentication"),
        (name = "koperasi", description = "Cooperative registry"),
        (name = "pengajuan", description = "Cooperative applications"),
        (name = "lokasi", description = "Geocoding"),
        (name = "dashboard", description = "Admin statistics"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Koperasi Kota Bogor API",
        version = "0.1.0",
        description = "API layanan pendaftaran dan registri koperasi Kota Bogor",
    )
)]
pub struct ApiDoc;

/// Registers the bearer scheme used by the admin routes
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("opaque")
                        .build(),
                ),
            );
        }
    }
}

/// Applies the runtime-configured title/version/description to the
/// generated document
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
