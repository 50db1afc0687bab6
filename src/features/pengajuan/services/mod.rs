mod intake_form;
mod pengajuan_service;

pub use intake_form::{check_document, DocumentUpload, IntakeForm, ValidatedIntake};
pub use pengajuan_service::PengajuanService;
