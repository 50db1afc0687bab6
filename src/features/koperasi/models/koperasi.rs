use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Cooperative status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "koperasi_status")]
pub enum KoperasiStatus {
    Aktif,
    Nonaktif,
}

impl KoperasiStatus {
    /// Flip Aktif <-> Nonaktif. Toggling twice returns the original status.
    pub fn toggled(self) -> Self {
        match self {
            KoperasiStatus::Aktif => KoperasiStatus::Nonaktif,
            KoperasiStatus::Nonaktif => KoperasiStatus::Aktif,
        }
    }
}

impl std::fmt::Display for KoperasiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KoperasiStatus::Aktif => write!(f, "Aktif"),
            KoperasiStatus::Nonaktif => write!(f, "Nonaktif"),
        }
    }
}

/// Database model for a registered cooperative.
///
/// Column names are the canonical field names for this entity everywhere
/// in the crate; DTO translation happens at the gateway boundary only.
#[derive(Debug, Clone, FromRow)]
pub struct Koperasi {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggled_is_an_involution() {
        assert_eq!(KoperasiStatus::Aktif.toggled(), KoperasiStatus::Nonaktif);
        assert_eq!(KoperasiStatus::Nonaktif.toggled(), KoperasiStatus::Aktif);
        assert_eq!(KoperasiStatus::Aktif.toggled().toggled(), KoperasiStatus::Aktif);
        assert_eq!(
            KoperasiStatus::Nonaktif.toggled().toggled(),
            KoperasiStatus::Nonaktif
        );
    }

    #[test]
    fn test_status_serializes_to_indonesian_labels() {
        assert_eq!(
            serde_json::to_string(&KoperasiStatus::Aktif).unwrap(),
            "\"Aktif\""
        );
        assert_eq!(
            serde_json::to_string(&KoperasiStatus::Nonaktif).unwrap(),
            "\"Nonaktif\""
        );
        // Values outside the enum are unrepresentable
        assert!(serde_json::from_str::<KoperasiStatus>("\"Ditutup\"").is_err());
    }
}
