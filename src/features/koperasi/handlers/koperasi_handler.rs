use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::models::CurrentAdmin;
use crate::features::koperasi::dtos::{
    KoperasiFilterQuery, KoperasiListQuery, KoperasiPetaQuery, KoperasiResponseDto,
    SaveKoperasiDto, ToggleStatusDto,
};
use crate::features::koperasi::services::{export_csv, KoperasiService};
use crate::shared::types::{ApiResponse, Meta};

/// List cooperatives
///
/// Public listing with equality filters, free-text search and pagination,
/// ordered by creation time descending.
#[utoipa::path(
    get,
    path = "/api/koperasi",
    params(KoperasiListQuery),
    responses(
        (status = 200, description = "Filtered cooperative listing", body = ApiResponse<Vec<KoperasiResponseDto>>)
    ),
    tag = "koperasi"
)]
pub async fn list_koperasi(
    State(service): State<Arc<KoperasiService>>,
    Query(query): Query<KoperasiListQuery>,
) -> Result<Json<ApiResponse<Vec<KoperasiResponseDto>>>> {
    let pagination = query.pagination();
    let (rows, total) = service
        .list(&query.filter(), pagination.offset(), pagination.limit())
        .await?;

    let items = rows.into_iter().map(KoperasiResponseDto::from).collect();
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Export the filtered registry as CSV
#[utoipa::path(
    get,
    path = "/api/koperasi/export",
    params(KoperasiFilterQuery),
    responses(
        (status = 200, description = "CSV export", body = String, content_type = "text/csv")
    ),
    tag = "koperasi"
)]
pub async fn export_koperasi(
    State(service): State<Arc<KoperasiService>>,
    Query(filter): Query<KoperasiFilterQuery>,
) -> Result<Response> {
    let rows = service.list_filtered(&filter).await?;
    let csv = export_csv(&rows);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"data-koperasi-kota-bogor.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

/// Cooperatives with coordinates, for the public map view
#[utoipa::path(
    get,
    path = "/api/koperasi/peta",
    params(KoperasiPetaQuery),
    responses(
        (status = 200, description = "Cooperatives with coordinates", body = ApiResponse<Vec<KoperasiResponseDto>>)
    ),
    tag = "koperasi"
)]
pub async fn peta_koperasi(
    State(service): State<Arc<KoperasiService>>,
    Query(query): Query<KoperasiPetaQuery>,
) -> Result<Json<ApiResponse<Vec<KoperasiResponseDto>>>> {
    let rows = service
        .list_with_coordinates(query.kecamatan.as_deref())
        .await?;

    let total = rows.len() as i64;
    let items = rows.into_iter().map(KoperasiResponseDto::from).collect();
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Get a single cooperative
#[utoipa::path(
    get,
    path = "/api/koperasi/{id}",
    params(("id" = Uuid, Path, description = "Cooperative id")),
    responses(
        (status = 200, description = "Cooperative detail", body = ApiResponse<KoperasiResponseDto>),
        (status = 404, description = "Not found")
    ),
    tag = "koperasi"
)]
pub async fn get_koperasi(
    State(service): State<Arc<KoperasiService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<KoperasiResponseDto>>> {
    let koperasi = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(koperasi.into()), None, None)))
}

/// Create a cooperative (admin)
#[utoipa::path(
    post,
    path = "/api/admin/koperasi",
    request_body = SaveKoperasiDto,
    responses(
        (status = 201, description = "Cooperative created", body = ApiResponse<KoperasiResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "koperasi",
    security(("bearer_auth" = []))
)]
pub async fn create_koperasi(
    admin: CurrentAdmin,
    State(service): State<Arc<KoperasiService>>,
    AppJson(dto): AppJson<SaveKoperasiDto>,
) -> Result<(StatusCode, Json<ApiResponse<KoperasiResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    tracing::debug!("Koperasi create requested by admin {}", admin.username);
    let koperasi = service.create(dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(koperasi.into()),
            Some("Koperasi berhasil ditambahkan".to_string()),
            None,
        )),
    ))
}

/// Update a cooperative (admin)
#[utoipa::path(
    put,
    path = "/api/admin/koperasi/{id}",
    params(("id" = Uuid, Path, description = "Cooperative id")),
    request_body = SaveKoperasiDto,
    responses(
        (status = 200, description = "Cooperative updated", body = ApiResponse<KoperasiResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found")
    ),
    tag = "koperasi",
    security(("bearer_auth" = []))
)]
pub async fn update_koperasi(
    admin: CurrentAdmin,
    State(service): State<Arc<KoperasiService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SaveKoperasiDto>,
) -> Result<Json<ApiResponse<KoperasiResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    tracing::debug!("Koperasi {} update requested by admin {}", id, admin.username);
    let koperasi = service.update(id, dto).await?;

    Ok(Json(ApiResponse::success(
        Some(koperasi.into()),
        Some("Koperasi berhasil diperbarui".to_string()),
        None,
    )))
}

/// Toggle the Aktif/Nonaktif status (admin)
#[utoipa::path(
    patch,
    path = "/api/admin/koperasi/{id}/status",
    params(("id" = Uuid, Path, description = "Cooperative id")),
    request_body = ToggleStatusDto,
    responses(
        (status = 200, description = "Status toggled", body = ApiResponse<KoperasiResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found")
    ),
    tag = "koperasi",
    security(("bearer_auth" = []))
)]
pub async fn toggle_koperasi_status(
    _admin: CurrentAdmin,
    State(service): State<Arc<KoperasiService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<ToggleStatusDto>,
) -> Result<Json<ApiResponse<KoperasiResponseDto>>> {
    let koperasi = service.toggle_status(id, dto.current_status).await?;

    Ok(Json(ApiResponse::success(
        Some(koperasi.into()),
        Some("Status koperasi berhasil diubah".to_string()),
        None,
    )))
}

/// Hard-delete a cooperative (admin); irreversible
#[utoipa::path(
    delete,
    path = "/api/admin/koperasi/{id}",
    params(("id" = Uuid, Path, description = "Cooperative id")),
    responses(
        (status = 200, description = "Cooperative deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found")
    ),
    tag = "koperasi",
    security(("bearer_auth" = []))
)]
pub async fn delete_koperasi(
    admin: CurrentAdmin,
    State(service): State<Arc<KoperasiService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;

    tracing::info!("Koperasi {} deleted by admin {}", id, admin.username);

    Ok(Json(ApiResponse::success(
        None,
        Some("Koperasi berhasil dihapus".to_string()),
        None,
    )))
}
