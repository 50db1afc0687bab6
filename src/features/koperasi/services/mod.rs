mod koperasi_service;

pub use koperasi_service::{export_csv, KoperasiService};
