use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::models::CurrentAdmin;
use crate::features::pengajuan::dtos::PengajuanFilterQuery;
use crate::features::pengajuan::models::{Pengajuan, PengajuanStatus};
use crate::features::pengajuan::services::intake_form::{DocumentUpload, ValidatedIntake};
use crate::modules::storage::MinIOClient;
use crate::shared::constants::FILTER_SEMUA;

const PENGAJUAN_COLUMNS: &str = "id, nama_koperasi, alamat_lengkap, kelurahan, kecamatan, \
     nama_ketua, nik_ketua, email_ketua, no_hp_ketua, jumlah_anggota, latitude, longitude, \
     file_ktp_ketua, file_ad_art, file_berita_acara, status, catatan_admin, diproses_oleh, \
     tanggal_diproses, tanggal_pengajuan, updated_at";

/// Canned review notes used when the admin does not supply one
const NOTE_APPROVED: &str = "Pengajuan disetujui oleh admin";
const NOTE_REJECTED: &str = "Pengajuan ditolak oleh admin";

/// Review transition rule: an application leaves `pending` exactly once,
/// to `approved` or `rejected`, and never reverts. Re-reviewing with the
/// same outcome stores the same final state; a conflicting outcome is
/// refused.
fn ensure_review_transition(
    current: PengajuanStatus,
    requested: PengajuanStatus,
) -> Result<()> {
    if requested == PengajuanStatus::Pending {
        return Err(AppError::Validation(
            "Status pengajuan hanya dapat diubah menjadi approved atau rejected".to_string(),
        ));
    }

    if current != PengajuanStatus::Pending && current != requested {
        return Err(AppError::Conflict(
            "Pengajuan sudah diproses dan tidak dapat diubah".to_string(),
        ));
    }

    Ok(())
}

/// Keep the original filename readable in the object key while dropping
/// anything that does not belong in one
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('_').is_empty() {
        "dokumen".to_string()
    } else {
        cleaned
    }
}

/// Service for cooperative applications: intake, listing and review
pub struct PengajuanService {
    pool: PgPool,
    storage: Arc<MinIOClient>,
}

impl PengajuanService {
    pub fn new(pool: PgPool, storage: Arc<MinIOClient>) -> Self {
        Self { pool, storage }
    }

    /// Delete documents uploaded by an aborted submission. Failures here
    /// are logged but never mask the error that triggered the compensation.
    async fn cleanup_uploaded(&self, keys: &[String]) {
        for key in keys {
            if let Err(e) = self.storage.delete(key).await {
                tracing::warn!("Failed to clean up orphaned document '{}': {}", key, e);
            }
        }
    }

    /// Upload one document under a collision-resistant key and return
    /// `(key, public_url)`
    async fn upload_document(&self, upload: &DocumentUpload) -> Result<(String, String)> {
        let key = self.storage.document_key(&format!(
            "{}-{}",
            Uuid::new_v4(),
            sanitize_file_name(&upload.file_name)
        ));

        self.storage
            .upload(&key, upload.data.clone(), &upload.content_type)
            .await?;

        let url = self.storage.get_public_url(&key);
        Ok((key, url))
    }

    /// Submit a validated application.
    ///
    /// Uploads the three documents, then inserts the row with status
    /// forced to `pending`. The two steps are not atomic; any failure
    /// after the first upload deletes whatever was already uploaded so no
    /// orphaned documents are left behind.
    pub async fn submit(&self, intake: ValidatedIntake) -> Result<Pengajuan> {
        let mut uploaded_keys: Vec<String> = Vec::with_capacity(3);
        let mut urls: Vec<String> = Vec::with_capacity(3);

        for upload in [&intake.ktp_ketua, &intake.ad_art, &intake.berita_acara] {
            match self.upload_document(upload).await {
                Ok((key, url)) => {
                    uploaded_keys.push(key);
                    urls.push(url);
                }
                Err(e) => {
                    tracing::error!("Document upload failed, aborting submission: {}", e);
                    self.cleanup_uploaded(&uploaded_keys).await;
                    return Err(e);
                }
            }
        }

        let insert = sqlx::query_as::<_, Pengajuan>(&format!(
            r#"
            INSERT INTO pengajuan_koperasi (
                nama_koperasi, alamat_lengkap, kelurahan, kecamatan,
                nama_ketua, nik_ketua, email_ketua, no_hp_ketua, jumlah_anggota,
                latitude, longitude,
                file_ktp_ketua, file_ad_art, file_berita_acara,
                status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, 'pending')
            RETURNING {}
            "#,
            PENGAJUAN_COLUMNS
        ))
        .bind(&intake.nama_koperasi)
        .bind(&intake.alamat_lengkap)
        .bind(&intake.kelurahan)
        .bind(&intake.kecamatan)
        .bind(&intake.nama_ketua)
        .bind(&intake.nik_ketua)
        .bind(&intake.email_ketua)
        .bind(&intake.no_hp_ketua)
        .bind(intake.jumlah_anggota)
        .bind(intake.latitude)
        .bind(intake.longitude)
        .bind(&urls[0])
        .bind(&urls[1])
        .bind(&urls[2])
        .fetch_one(&self.pool)
        .await;

        let pengajuan = match insert {
            Ok(p) => p,
            Err(e) => {
                tracing::error!("Application insert failed, removing uploaded documents: {:?}", e);
                self.cleanup_uploaded(&uploaded_keys).await;
                return Err(AppError::Database(e));
            }
        };

        tracing::info!(
            "Pengajuan submitted: id={}, nama={}, kecamatan={}",
            pengajuan.id,
            pengajuan.nama_koperasi,
            pengajuan.kecamatan
        );

        Ok(pengajuan)
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &PengajuanFilterQuery) {
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(kecamatan) = filter
            .kecamatan
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty() && *v != FILTER_SEMUA)
        {
            qb.push(" AND kecamatan = ").push_bind(kecamatan.to_string());
        }
    }

    /// Filtered, paginated listing ordered by submission time descending
    pub async fn list(
        &self,
        filter: &PengajuanFilterQuery,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Pengajuan>, i64)> {
        let mut count_qb =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM pengajuan_koperasi WHERE 1=1");
        Self::push_filters(&mut count_qb, filter);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM pengajuan_koperasi WHERE 1=1",
            PENGAJUAN_COLUMNS
        ));
        Self::push_filters(&mut qb, filter);
        qb.push(" ORDER BY tanggal_pengajuan DESC");
        qb.push(" OFFSET ").push_bind(offset);
        qb.push(" LIMIT ").push_bind(limit);

        let rows = qb
            .build_query_as::<Pengajuan>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list pengajuan: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((rows, total))
    }

    pub async fn get(&self, id: Uuid) -> Result<Pengajuan> {
        sqlx::query_as::<_, Pengajuan>(&format!(
            "SELECT {} FROM pengajuan_koperasi WHERE id = $1",
            PENGAJUAN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Pengajuan tidak ditemukan".to_string()))
    }

    /// Adjudicate an application.
    ///
    /// The acting admin is the one resolved from the session; the target
    /// status must be `approved` or `rejected`. A pending row transitions
    /// once; re-reviewing with the same outcome stores the same final
    /// state, a conflicting outcome is refused.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: PengajuanStatus,
        catatan: Option<String>,
        admin: &CurrentAdmin,
    ) -> Result<Pengajuan> {
        let current = self.get(id).await?;
        ensure_review_transition(current.status, status)?;

        let catatan = catatan.unwrap_or_else(|| {
            match status {
                PengajuanStatus::Approved => NOTE_APPROVED,
                _ => NOTE_REJECTED,
            }
            .to_string()
        });

        let pengajuan = sqlx::query_as::<_, Pengajuan>(&format!(
            r#"
            UPDATE pengajuan_koperasi
            SET status = $2, catatan_admin = $3, diproses_oleh = $4,
                tanggal_diproses = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PENGAJUAN_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .bind(&catatan)
        .bind(admin.id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            "Pengajuan {} set to {} by admin {} ({})",
            id,
            status,
            admin.username,
            admin.id
        );

        Ok(pengajuan)
    }

    /// Deletion is declared but intentionally unimplemented in this version
    pub fn delete(&self, _id: Uuid) -> Result<()> {
        Err(AppError::NotImplemented(
            "Fitur hapus belum diimplementasi".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("ktp budi.pdf"), "ktp_budi.pdf");
        assert_eq!(sanitize_file_name("AD-ART_2024.pdf"), "AD-ART_2024.pdf");
        assert_eq!(sanitize_file_name("акта.pdf"), "____.pdf");
        assert_eq!(sanitize_file_name("???"), "dokumen");
    }

    #[test]
    fn test_canned_notes() {
        assert_eq!(NOTE_APPROVED, "Pengajuan disetujui oleh admin");
        assert_eq!(NOTE_REJECTED, "Pengajuan ditolak oleh admin");
    }

    #[test]
    fn test_review_transition_rule() {
        use PengajuanStatus::*;

        // A pending application can be adjudicated either way
        assert!(ensure_review_transition(Pending, Approved).is_ok());
        assert!(ensure_review_transition(Pending, Rejected).is_ok());

        // Re-reviewing with the same outcome is idempotent
        assert!(ensure_review_transition(Approved, Approved).is_ok());
        assert!(ensure_review_transition(Rejected, Rejected).is_ok());

        // A decided application never flips to the other outcome
        assert!(matches!(
            ensure_review_transition(Approved, Rejected),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            ensure_review_transition(Rejected, Approved),
            Err(AppError::Conflict(_))
        ));

        // Nothing ever reverts to pending
        assert!(matches!(
            ensure_review_transition(Approved, Pending),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            ensure_review_transition(Pending, Pending),
            Err(AppError::Validation(_))
        ));
    }
}
