mod pengajuan_handler;

pub use pengajuan_handler::*;
