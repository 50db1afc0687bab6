pub mod auth;
pub mod dashboard;
pub mod koperasi;
pub mod locations;
pub mod pengajuan;
