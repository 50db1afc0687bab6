mod koperasi;

pub use koperasi::{Koperasi, KoperasiStatus};
