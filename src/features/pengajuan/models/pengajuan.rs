use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Application status enum matching database enum.
///
/// Starts at `pending` and transitions exactly once to `approved` or
/// `rejected` through a review action; it never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "pengajuan_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PengajuanStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for PengajuanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PengajuanStatus::Pending => write!(f, "pending"),
            PengajuanStatus::Approved => write!(f, "approved"),
            PengajuanStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Database model for a cooperative application.
///
/// Column names are the canonical field names for this entity everywhere
/// in the crate. Document columns are nullable in storage; intake
/// validation guarantees they are present on rows created through the
/// public form.
#[derive(Debug, Clone, FromRow)]
pub struct Pengajuan {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PengajuanStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::from_str::<PengajuanStatus>("\"approved\"").unwrap(),
            PengajuanStatus::Approved
        );
        assert!(serde_json::from_str::<PengajuanStatus>("\"ditolak\"").is_err());
    }
}
