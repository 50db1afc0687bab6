use sqlx::PgPool;
use std::collections::HashMap;

use crate::core::error::Result;
use crate::features::dashboard::dtos::{DashboardStatsDto, KecamatanStatDto};
use crate::features::pengajuan::models::Pengajuan;
use crate::shared::constants::KECAMATAN_KOTA_BOGOR;

/// How many recent applications the dashboard shows
const RECENT_PENGAJUAN_LIMIT: i64 = 5;

/// Build the per-kecamatan share table over the six known kecamatan
fn build_kecamatan_stats(total: i64, counts: &HashMap<String, i64>) -> Vec<KecamatanStatDto> {
    KECAMATAN_KOTA_BOGOR
        .iter()
        .map(|&kecamatan| {
            let jumlah = counts.get(kecamatan).copied().unwrap_or(0);
            let persentase = if total > 0 {
                (jumlah as f64 * 1000.0 / total as f64).round() / 10.0
            } else {
                0.0
            };
            KecamatanStatDto {
                kecamatan: kecamatan.to_string(),
                jumlah,
                persentase,
            }
        })
        .collect()
}

/// Service for admin dashboard statistics
pub struct DashboardService {
    pool: PgPool,
}

impl DashboardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn koperasi_counts(&self) -> Result<(i64, i64)> {
        let counts = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'Aktif')
            FROM koperasi
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    async fn pengajuan_counts(&self) -> Result<(i64, i64)> {
        let counts = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'pending')
            FROM pengajuan_koperasi
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    async fn kecamatan_counts(&self) -> Result<HashMap<String, i64>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT kecamatan, COUNT(*)
            FROM koperasi
            GROUP BY kecamatan
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    async fn recent_pengajuan(&self) -> Result<Vec<Pengajuan>> {
        let rows = sqlx::query_as::<_, Pengajuan>(
            r#"
            SELECT id, nama_koperasi, alamat_lengkap, kelurahan, kecamatan,
                   nama_ketua, nik_ketua, email_ketua, no_hp_ketua, jumlah_anggota,
                   latitude, longitude, file_ktp_ketua, file_ad_art, file_berita_acara,
                   status, catatan_admin, diproses_oleh, tanggal_diproses,
                   tanggal_pengajuan, updated_at
            FROM pengajuan_koperasi
            ORDER BY tanggal_pengajuan DESC
            LIMIT $1
            "#,
        )
        .bind(RECENT_PENGAJUAN_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Gather all dashboard statistics with concurrent fan-out; the four
    /// independent reads are issued together and awaited as a group
    pub async fn stats(&self) -> Result<DashboardStatsDto> {
        let (koperasi, pengajuan, kecamatan, recent) = tokio::try_join!(
            self.koperasi_counts(),
            self.pengajuan_counts(),
            self.kecamatan_counts(),
            self.recent_pengajuan(),
        )?;

        let (total_koperasi, koperasi_aktif) = koperasi;
        let (total_pengajuan, pengajuan_pending) = pengajuan;

        Ok(DashboardStatsDto {
            total_koperasi,
            koperasi_aktif,
            total_pengajuan,
            pengajuan_pending,
            per_kecamatan: build_kecamatan_stats(total_koperasi, &kecamatan),
            pengajuan_terbaru: recent.into_iter().map(Into::into).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kecamatan_stats_cover_all_six() {
        let mut counts = HashMap::new();
        counts.insert("Bogor Utara".to_string(), 3i64);
        counts.insert("Tanah Sareal".to_string(), 1i64);

        let stats = build_kecamatan_stats(8, &counts);
        assert_eq!(stats.len(), KECAMATAN_KOTA_BOGOR.len());

        let utara = stats.iter().find(|s| s.kecamatan == "Bogor Utara").unwrap();
        assert_eq!(utara.jumlah, 3);
        assert_eq!(utara.persentase, 37.5);

        let tengah = stats.iter().find(|s| s.kecamatan == "Bogor Tengah").unwrap();
        assert_eq!(tengah.jumlah, 0);
        assert_eq!(tengah.persentase, 0.0);
    }

    #[test]
    fn test_kecamatan_stats_with_empty_registry() {
        let stats = build_kecamatan_stats(0, &HashMap::new());
        assert!(stats.iter().all(|s| s.jumlah == 0 && s.persentase == 0.0));
    }
}
