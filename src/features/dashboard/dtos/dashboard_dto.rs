use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::pengajuan::dtos::PengajuanResponseDto;

/// Cooperative count and share for one kecamatan
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct KecamatanStatDto {
    pub kecamatan: String,
    pub jumlah: i64,
    /// Share of the registry in percent, one decimal
    pub persentase: f64,
}

/// Aggregated statistics for the admin dashboard
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardStatsDto {
    pub total_koperasi: i64,
    pub koperasi_aktif: i64,
    pub total_pengajuan: i64,
    pub pengajuan_pending: i64,
    pub per_kecamatan: Vec<KecamatanStatDto>,
    /// Five most recent applications
    pub pengajuan_terbaru: Vec<PengajuanResponseDto>,
}
