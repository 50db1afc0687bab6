mod pengajuan;

pub use pengajuan::{Pengajuan, PengajuanStatus};
