use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::koperasi::models::{Koperasi, KoperasiStatus};
use crate::shared::types::PaginationQuery;

/// Equality/search filters shared by the listing, export and map endpoints.
///
/// The sentinel value `"Semua"` means "no filter" and is excluded from the
/// filtering logic by the service.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct KoperasiFilterQuery {
    /// Filter by kecamatan ("Semua" = all)
    pub kecamatan: Option<String>,
    /// Filter by kelurahan ("Semua" = all)
    pub kelurahan: Option<String>,
    /// Filter by status
    pub status: Option<KoperasiStatus>,
    /// Free-text search over name, address and kelurahan
    pub q: Option<String>,
}

/// Listing query: filters plus pagination
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct KoperasiListQuery {
    /// Filter by kecamatan ("Semua" = all)
    pub kecamatan: Option<String>,
    /// Filter by kelurahan ("Semua" = all)
    pub kelurahan: Option<String>,
    /// Filter by status
    pub status: Option<KoperasiStatus>,
    /// Free-text search over name, address and kelurahan
    pub q: Option<String>,

    #[serde(default = "default_page")]
    pub page: i64,

    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl KoperasiListQuery {
    pub fn filter(&self) -> KoperasiFilterQuery {
        KoperasiFilterQuery {
            kecamatan: self.kecamatan.clone(),
            kelurahan: self.kelurahan.clone(),
            status: self.status,
            q: self.q.clone(),
        }
    }

    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    crate::shared::constants::DEFAULT_PAGE_SIZE
}

/// Map query: kecamatan filter only
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct KoperasiPetaQuery {
    pub kecamatan: Option<String>,
}

/// Request DTO for creating or updating a cooperative
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SaveKoperasiDto {
    #[validate(length(min = 1, message = "Nama koperasi wajib diisi"))]
    pub nama_koperasi: String,

    #[validate(length(min = 1, message = "Alamat wajib diisi"))]
    pub alamat_lengkap: String,

    #[validate(length(min = 1, message = "Kelurahan wajib diisi"))]
    pub kelurahan: String,

    #[validate(length(min = 1, message = "Kecamatan wajib dipilih"))]
    pub kecamatan: String,

    /// Optional coordinates; either both present or both absent
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    #[serde(default = "default_status")]
    pub status: KoperasiStatus,
}

fn default_status() -> KoperasiStatus {
    KoperasiStatus::Aktif
}

/// Request DTO for the status toggle.
///
/// Carries the client's view of the current status; anything outside the
/// two known values is rejected at deserialization.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ToggleStatusDto {
    pub current_status: KoperasiStatus,
}

/// Response DTO for a cooperative
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct KoperasiResponseDto {
    pub id: Uuid,
    pub nama_koperasi: String,
    pub alamat_lengkap: String,
    pub kelurahan: String,
    pub kecamatan: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: KoperasiStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Koperasi> for KoperasiResponseDto {
    fn from(k: Koperasi) -> Self {
        Self {
            id: k.id,
            nama_koperasi: k.nama_koperasi,
            alamat_lengkap: k.alamat_lengkap,
            kelurahan: k.kelurahan,
            kecamatan: k.kecamatan,
            latitude: k.latitude,
            longitude: k.longitude,
            status: k.status,
            created_at: k.created_at,
            updated_at: k.updated_at,
        }
    }
}
