use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::locations::dtos::{LocationDto, ReverseQuery, SearchQuery};
use crate::features::locations::services::{format_coordinate_label, Geocoder, MIN_QUERY_LEN};
use crate::shared::types::ApiResponse;

/// Forward geocode a free-text query
///
/// Bounded to Kota Bogor, at most 5 ranked candidates. Queries shorter
/// than 3 characters return an empty list without contacting the
/// geocoding service; upstream failures also yield an empty list.
#[utoipa::path(
    get,
    path = "/api/lokasi/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Ranked candidates", body = ApiResponse<Vec<LocationDto>>)
    ),
    tag = "lokasi"
)]
pub async fn search_location(
    State(geocoder): State<Arc<dyn Geocoder>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<LocationDto>>>> {
    if query.q.trim().chars().count() < MIN_QUERY_LEN {
        return Ok(Json(ApiResponse::success(Some(Vec::new()), None, None)));
    }

    let candidates = geocoder.search(query.q.trim()).await;
    let items = candidates.into_iter().map(LocationDto::from).collect();

    Ok(Json(ApiResponse::success(Some(items), None, None)))
}

/// Reverse geocode a coordinate
///
/// Falls back to the raw coordinate string as the location label when the
/// lookup fails; never errors toward the caller.
#[utoipa::path(
    get,
    path = "/api/lokasi/reverse",
    params(ReverseQuery),
    responses(
        (status = 200, description = "Resolved location", body = ApiResponse<LocationDto>)
    ),
    tag = "lokasi"
)]
pub async fn reverse_location(
    State(geocoder): State<Arc<dyn Geocoder>>,
    Query(query): Query<ReverseQuery>,
) -> Result<Json<ApiResponse<LocationDto>>> {
    let location = geocoder
        .reverse(query.lat, query.lon)
        .await
        .unwrap_or_else(|| format_coordinate_label(query.lat, query.lon));

    Ok(Json(ApiResponse::success(
        Some(LocationDto {
            location,
            latitude: query.lat,
            longitude: query.lon,
        }),
        None,
        None,
    )))
}
