use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::pengajuan::models::{Pengajuan, PengajuanStatus};
use crate::shared::types::PaginationQuery;

/// Equality filters for the application listing.
///
/// The sentinel value `"Semua"` on kecamatan means "no filter".
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct PengajuanFilterQuery {
    /// Filter by review status
    pub status: Option<PengajuanStatus>,
    /// Filter by kecamatan ("Semua" = all)
    pub kecamatan: Option<String>,
}

/// Listing query: filters plus pagination
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PengajuanListQuery {
    pub status: Option<PengajuanStatus>,
    pub kecamatan: Option<String>,

    #[serde(default = "default_page")]
    pub page: i64,

    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl PengajuanListQuery {
    pub fn filter(&self) -> PengajuanFilterQuery {
        PengajuanFilterQuery {
            status: self.status,
            kecamatan: self.kecamatan.clone(),
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

/// Multipart intake form for OpenAPI documentation.
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler reads the multipart stream directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitPengajuanDto {
    pub nama_koperasi: String,
    pub alamat_lengkap: String,
    pub kelurahan: String,
    pub kecamatan: String,
    pub nama_ketua: String,
    /// 16-digit national ID number
    pub nik_ketua: String,
    pub email_ketua: String,
    pub no_hp_ketua: String,
    /// Member count, at least 20
    pub jumlah_anggota: i32,
    pub latitude: f64,
    pub longitude: f64,
    /// Chair's ID card (PDF/JPG/PNG, max 5MB)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file_ktp_ketua: String,
    /// Bylaws document (PDF/JPG/PNG, max 5MB)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file_ad_art: String,
    /// Formation minutes (PDF/JPG/PNG, max 5MB)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file_berita_acara: String,
}

/// Request DTO for the review decision
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateStatusDto {
    /// Target status; only `approved` or `rejected` are accepted
    pub status: PengajuanStatus,
    /// Review note; a canned note is used when absent
    pub catatan: Option<String>,
}

/// Response DTO for an application
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PengajuanResponseDto {
    pub id: Uuid,
    pub nama_koperasi: String,
    pub alamat_lengkap: String,
    pub kelurahan: String,
    pub kecamatan: String,
    pub nama_ketua: String,
    pub nik_ketua: String,
    pub email_ketua: String,
    pub no_hp_ketua: String,
    pub jumlah_anggota: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub file_ktp_ketua: Option<String>,
    pub file_ad_art: Option<String>,
    pub file_berita_acara: Option<String>,
    pub status: PengajuanStatus,
    pub catatan_admin: Option<String>,
    pub diproses_oleh: Option<Uuid>,
    pub tanggal_diproses: Option<DateTime<Utc>>,
    pub tanggal_pengajuan: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Pengajuan> for PengajuanResponseDto {
    fn from(p: Pengajuan) -> Self {
        Self {
            id: p.id,
            nama_koperasi: p.nama_koperasi,
            alamat_lengkap: p.alamat_lengkap,
            kelurahan: p.kelurahan,
            kecamatan: p.kecamatan,
            nama_ketua: p.nama_ketua,
            nik_ketua: p.nik_ketua,
            email_ketua: p.email_ketua,
            no_hp_ketua: p.no_hp_ketua,
            jumlah_anggota: p.jumlah_anggota,
            latitude: p.latitude,
            longitude: p.longitude,
            file_ktp_ketua: p.file_ktp_ketua,
            file_ad_art: p.file_ad_art,
            file_berita_acara: p.file_berita_acara,
            status: p.status,
            catatan_admin: p.catatan_admin,
            diproses_oleh: p.diproses_oleh,
            tanggal_diproses: p.tanggal_diproses,
            tanggal_pengajuan: p.tanggal_pengajuan,
            updated_at: p.updated_at,
        }
    }
}

/// A submitted document with the MIME type sniffed from its URL, for
/// preview/download actions in the review screen
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DokumenDto {
    pub label: String,
    pub url: String,
    pub content_type: String,
}

/// Detail view: the application plus its document list
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PengajuanDetailDto {
    #[serde(flatten)]
    pub pengajuan: PengajuanResponseDto,
    pub dokumen: Vec<DokumenDto>,
}

/// Sniff the MIME type for preview purposes from the file extension in a
/// stored URL. Everything that is not a PDF is treated as an image, which
/// is what the upload allowlist guarantees.
pub fn content_type_from_url(url: &str) -> &'static str {
    if url.to_lowercase().contains(".pdf") {
        "application/pdf"
    } else {
        "image/jpeg"
    }
}

impl PengajuanDetailDto {
    pub fn from_model(p: Pengajuan) -> Self {
        let labeled = [
            ("KTP Ketua", p.file_ktp_ketua.clone()),
            ("AD/ART", p.file_ad_art.clone()),
            ("Berita Acara Pembentukan", p.file_berita_acara.clone()),
        ];

        let dokumen = labeled
            .into_iter()
            .filter_map(|(label, url)| {
                url.map(|url| DokumenDto {
                    label: label.to_string(),
                    content_type: content_type_from_url(&url).to_string(),
                    url,
                })
            })
            .collect();

        Self {
            pengajuan: p.into(),
            dokumen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_from_url() {
        assert_eq!(
            content_type_from_url("https://files.example.id/b/pengajuan/a-ktp.pdf"),
            "application/pdf"
        );
        assert_eq!(
            content_type_from_url("https://files.example.id/b/pengajuan/a-KTP.PDF"),
            "application/pdf"
        );
        assert_eq!(
            content_type_from_url("https://files.example.id/b/pengajuan/a-ktp.jpg"),
            "image/jpeg"
        );
        assert_eq!(
            content_type_from_url("https://files.example.id/b/pengajuan/a-foto.png"),
            "image/jpeg"
        );
    }
}
