use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::koperasi::dtos::{KoperasiFilterQuery, SaveKoperasiDto};
use crate::features::koperasi::models::{Koperasi, KoperasiStatus};
use crate::shared::constants::FILTER_SEMUA;

const KOPERASI_COLUMNS: &str = "id, nama_koperasi, alamat_lengkap, kelurahan, kecamatan, \
     latitude, longitude, status, created_at, updated_at";

/// Returns the filter value unless it is empty or the "Semua" sentinel
fn effective_filter(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != FILTER_SEMUA)
        .map(str::to_string)
}

/// Coordinates must be either both present or both absent
fn ensure_coordinate_pair(latitude: Option<f64>, longitude: Option<f64>) -> Result<()> {
    if latitude.is_some() != longitude.is_some() {
        return Err(AppError::Validation(
            "Latitude dan longitude harus diisi bersamaan".to_string(),
        ));
    }
    Ok(())
}

/// Service for the cooperative registry
pub struct KoperasiService {
    pool: PgPool,
}

impl KoperasiService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &KoperasiFilterQuery) {
        if let Some(kecamatan) = effective_filter(filter.kecamatan.as_deref()) {
            qb.push(" AND kecamatan = ").push_bind(kecamatan);
        }
        if let Some(kelurahan) = effective_filter(filter.kelurahan.as_deref()) {
            qb.push(" AND kelurahan = ").push_bind(kelurahan);
        }
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let pattern = format!("%{}%", q);
            qb.push(" AND (nama_koperasi ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR alamat_lengkap ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR kelurahan ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }

    /// Filtered, paginated listing ordered by creation time descending.
    /// Returns the page plus the total row count of the filtered set.
    pub async fn list(
        &self,
        filter: &KoperasiFilterQuery,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Koperasi>, i64)> {
        let mut count_qb =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM koperasi WHERE 1=1");
        Self::push_filters(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count koperasi: {:?}", e);
                AppError::Database(e)
            })?;

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM koperasi WHERE 1=1",
            KOPERASI_COLUMNS
        ));
        Self::push_filters(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC");
        qb.push(" OFFSET ").push_bind(offset);
        qb.push(" LIMIT ").push_bind(limit);

        let rows = qb
            .build_query_as::<Koperasi>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list koperasi: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((rows, total))
    }

    /// Full filtered set without pagination, used by the CSV export
    pub async fn list_filtered(&self, filter: &KoperasiFilterQuery) -> Result<Vec<Koperasi>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM koperasi WHERE 1=1",
            KOPERASI_COLUMNS
        ));
        Self::push_filters(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC");

        let rows = qb
            .build_query_as::<Koperasi>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Rows with both coordinates present, for map plotting
    pub async fn list_with_coordinates(
        &self,
        kecamatan: Option<&str>,
    ) -> Result<Vec<Koperasi>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM koperasi WHERE latitude IS NOT NULL AND longitude IS NOT NULL",
            KOPERASI_COLUMNS
        ));
        if let Some(kecamatan) = effective_filter(kecamatan) {
            qb.push(" AND kecamatan = ").push_bind(kecamatan);
        }
        qb.push(" ORDER BY created_at DESC");

        let rows = qb
            .build_query_as::<Koperasi>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn get(&self, id: Uuid) -> Result<Koperasi> {
        sqlx::query_as::<_, Koperasi>(&format!(
            "SELECT {} FROM koperasi WHERE id = $1",
            KOPERASI_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Koperasi tidak ditemukan".to_string()))
    }

    pub async fn create(&self, dto: SaveKoperasiDto) -> Result<Koperasi> {
        ensure_coordinate_pair(dto.latitude, dto.longitude)?;

        let koperasi = sqlx::query_as::<_, Koperasi>(&format!(
            r#"
            INSERT INTO koperasi (nama_koperasi, alamat_lengkap, kelurahan, kecamatan,
                                  latitude, longitude, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            KOPERASI_COLUMNS
        ))
        .bind(&dto.nama_koperasi)
        .bind(&dto.alamat_lengkap)
        .bind(&dto.kelurahan)
        .bind(&dto.kecamatan)
        .bind(dto.latitude)
        .bind(dto.longitude)
        .bind(dto.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert koperasi: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Koperasi created: id={}, nama={}",
            koperasi.id,
            koperasi.nama_koperasi
        );

        Ok(koperasi)
    }

    /// Field-mapped update; `updated_at` is refreshed server-side
    pub async fn update(&self, id: Uuid, dto: SaveKoperasiDto) -> Result<Koperasi> {
        ensure_coordinate_pair(dto.latitude, dto.longitude)?;

        sqlx::query_as::<_, Koperasi>(&format!(
            r#"
            UPDATE koperasi
            SET nama_koperasi = $2, alamat_lengkap = $3, kelurahan = $4, kecamatan = $5,
                latitude = $6, longitude = $7, status = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            KOPERASI_COLUMNS
        ))
        .bind(id)
        .bind(&dto.nama_koperasi)
        .bind(&dto.alamat_lengkap)
        .bind(&dto.kelurahan)
        .bind(&dto.kecamatan)
        .bind(dto.latitude)
        .bind(dto.longitude)
        .bind(dto.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Koperasi tidak ditemukan".to_string()))
    }

    /// Hard delete; irreversible
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM koperasi WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Koperasi tidak ditemukan".to_string()));
        }

        tracing::info!("Koperasi deleted: id={}", id);

        Ok(())
    }

    /// Flip Aktif <-> Nonaktif based on the caller's view of the current
    /// status. The flip is computed from that value, mirroring the toggle
    /// action in the admin screen.
    pub async fn toggle_status(&self, id: Uuid, current: KoperasiStatus) -> Result<Koperasi> {
        let new_status = current.toggled();

        sqlx::query_as::<_, Koperasi>(&format!(
            r#"
            UPDATE koperasi
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            KOPERASI_COLUMNS
        ))
        .bind(id)
        .bind(new_status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Koperasi tidak ditemukan".to_string()))
    }
}

/// Build the CSV export of the registry (columns mirror the public listing
/// screen). Name and address are quoted since they routinely contain commas.
pub fn export_csv(rows: &[Koperasi]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push("No,Nama Koperasi,Alamat,Kelurahan,Kecamatan,Status".to_string());

    for (i, k) in rows.iter().enumerate() {
        lines.push(format!(
            "{},\"{}\",\"{}\",{},{},{}",
            i + 1,
            k.nama_koperasi.replace('"', "\"\""),
            k.alamat_lengkap.replace('"', "\"\""),
            k.kelurahan,
            k.kecamatan,
            k.status
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(nama: &str, kecamatan: &str) -> Koperasi {
        Koperasi {
            id: Uuid::new_v4(),
            nama_koperasi: nama.to_string(),
            alamat_lengkap: "Jl. Pajajaran No. 1, Bogor".to_string(),
            kelurahan: "Baranangsiang".to_string(),
            kecamatan: kecamatan.to_string(),
            latitude: Some(-6.6),
            longitude: Some(106.8),
            status: KoperasiStatus::Aktif,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_effective_filter_excludes_sentinel() {
        assert_eq!(effective_filter(Some("Bogor Utara")), Some("Bogor Utara".to_string()));
        assert_eq!(effective_filter(Some("Semua")), None);
        assert_eq!(effective_filter(Some("")), None);
        assert_eq!(effective_filter(Some("  ")), None);
        assert_eq!(effective_filter(None), None);
    }

    #[test]
    fn test_ensure_coordinate_pair() {
        assert!(ensure_coordinate_pair(Some(-6.6), Some(106.8)).is_ok());
        assert!(ensure_coordinate_pair(None, None).is_ok());
        assert!(ensure_coordinate_pair(Some(-6.6), None).is_err());
        assert!(ensure_coordinate_pair(None, Some(106.8)).is_err());
    }

    #[test]
    fn test_export_csv_header_and_rows() {
        let rows = vec![
            sample("Koperasi Sejahtera", "Bogor Utara"),
            sample("Koperasi \"Maju\"", "Bogor Timur"),
        ];
        let csv = export_csv(&rows);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "No,Nama Koperasi,Alamat,Kelurahan,Kecamatan,Status");
        assert!(lines[1].starts_with("1,\"Koperasi Sejahtera\""));
        assert!(lines[1].ends_with("Baranangsiang,Bogor Utara,Aktif"));
        // Embedded quotes are doubled
        assert!(lines[2].contains("\"Koperasi \"\"Maju\"\"\""));
    }

    #[test]
    fn test_export_csv_empty() {
        assert_eq!(
            export_csv(&[]),
            "No,Nama Koperasi,Alamat,Kelurahan,Kecamatan,Status"
        );
    }
}
