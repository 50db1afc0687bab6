mod koperasi_handler;

pub use koperasi_handler::*;
