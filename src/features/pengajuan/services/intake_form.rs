//! Intake form assembly and validation.
//!
//! The multipart handler collects raw field values into [`IntakeForm`];
//! [`IntakeForm::validate`] then reports every failing field at once
//! instead of short-circuiting on the first error, mirroring the field
//! level error map of the public form.

use validator::ValidateEmail;

use crate::shared::constants::MAX_DOCUMENT_SIZE;
use crate::shared::validation::{NIK_REGEX, PHONE_REGEX};

/// Allowed MIME types for application documents
pub const ALLOWED_DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/jpg",
    "image/png",
];

/// An uploaded document part, read fully into memory
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Check the per-document constraints: size cap and MIME allowlist.
/// A violating selection is discarded by the caller.
pub fn check_document(upload: &DocumentUpload) -> Result<(), String> {
    if upload.data.len() > MAX_DOCUMENT_SIZE {
        return Err("Ukuran file maksimal 5MB".to_string());
    }

    if !ALLOWED_DOCUMENT_TYPES.contains(&upload.content_type.as_str()) {
        return Err("Format file harus PDF, JPG, JPEG, atau PNG".to_string());
    }

    Ok(())
}

/// Raw intake form as collected from the multipart stream
#[derive(Debug, Default)]
pub struct IntakeForm {
    pub nama_koperasi: Option<String>,
    pub alamat_lengkap: Option<String>,
    pub kelurahan: Option<String>,
    pub kecamatan: Option<String>,
    pub nama_ketua: Option<String>,
    pub nik_ketua: Option<String>,
    pub email_ketua: Option<String>,
    pub no_hp_ketua: Option<String>,
    pub jumlah_anggota: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub file_ktp_ketua: Option<DocumentUpload>,
    pub file_ad_art: Option<DocumentUpload>,
    pub file_berita_acara: Option<DocumentUpload>,
}

/// A fully validated application, ready for upload and insert
#[derive(Debug)]
pub struct ValidatedIntake {
    pub nama_koperasi: String,
    pub alamat_lengkap: String,
    pub kelurahan: String,
    pub kecamatan: String,
    pub nama_ketua: String,
    pub nik_ketua: String,
    pub email_ketua: String,
    pub no_hp_ketua: String,
    pub jumlah_anggota: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub ktp_ketua: DocumentUpload,
    pub ad_art: DocumentUpload,
    pub berita_acara: DocumentUpload,
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl IntakeForm {
    /// Validate the whole form, collecting every failing field.
    ///
    /// `file_errors` carries constraint violations recorded while the
    /// multipart stream was read (oversized or wrong-type selections that
    /// were already discarded); they are reported together with the
    /// presence/format errors found here.
    pub fn validate(self, file_errors: Vec<String>) -> Result<ValidatedIntake, Vec<String>> {
        let mut errors = file_errors;

        let nama_koperasi = present(&self.nama_koperasi);
        if nama_koperasi.is_none() {
            errors.push("Nama koperasi wajib diisi".to_string());
        }

        let alamat_lengkap = present(&self.alamat_lengkap);
        if alamat_lengkap.is_none() {
            errors.push("Alamat wajib diisi".to_string());
        }

        let kecamatan = present(&self.kecamatan);
        if kecamatan.is_none() {
            errors.push("Kecamatan wajib dipilih".to_string());
        }

        let kelurahan = present(&self.kelurahan);
        if kelurahan.is_none() {
            errors.push("Kelurahan wajib diisi".to_string());
        }

        let nama_ketua = present(&self.nama_ketua);
        if nama_ketua.is_none() {
            errors.push("Nama ketua wajib diisi".to_string());
        }

        let nik_ketua = match present(&self.nik_ketua) {
            None => {
                errors.push("NIK ketua wajib diisi".to_string());
                None
            }
            Some(nik) if !NIK_REGEX.is_match(&nik) => {
                errors.push("NIK harus terdiri dari 16 digit".to_string());
                None
            }
            Some(nik) => Some(nik),
        };

        let email_ketua = match present(&self.email_ketua) {
            None => {
                errors.push("Email wajib diisi".to_string());
                None
            }
            Some(email) if !email.validate_email() => {
                errors.push("Format email tidak valid".to_string());
                None
            }
            Some(email) => Some(email),
        };

        let no_hp_ketua = match present(&self.no_hp_ketua) {
            None => {
                errors.push("Telepon wajib diisi".to_string());
                None
            }
            Some(phone) if !PHONE_REGEX.is_match(&phone) => {
                errors.push("Format nomor telepon tidak valid".to_string());
                None
            }
            Some(phone) => Some(phone),
        };

        let jumlah_anggota = match present(&self.jumlah_anggota) {
            None => {
                errors.push("Jumlah anggota wajib diisi".to_string());
                None
            }
            Some(raw) => match raw.parse::<i32>() {
                Err(_) => {
                    errors.push("Jumlah anggota harus berupa angka".to_string());
                    None
                }
                Ok(n) if n < 20 => {
                    errors.push("Jumlah anggota minimal 20".to_string());
                    None
                }
                Ok(n) => Some(n),
            },
        };

        let latitude = present(&self.latitude).and_then(|v| v.parse::<f64>().ok());
        let longitude = present(&self.longitude).and_then(|v| v.parse::<f64>().ok());
        let coordinates = match (latitude, longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => {
                errors.push("Lokasi pada peta wajib dipilih".to_string());
                None
            }
        };

        if self.file_ktp_ketua.is_none() {
            errors.push("File KTP wajib diupload".to_string());
        }
        if self.file_ad_art.is_none() {
            errors.push("File AD/ART wajib diupload".to_string());
        }
        if self.file_berita_acara.is_none() {
            errors.push("File Berita Acara wajib diupload".to_string());
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let (latitude, longitude) = coordinates.unwrap();

        Ok(ValidatedIntake {
            nama_koperasi: nama_koperasi.unwrap(),
            alamat_lengkap: alamat_lengkap.unwrap(),
            kelurahan: kelurahan.unwrap(),
            kecamatan: kecamatan.unwrap(),
            nama_ketua: nama_ketua.unwrap(),
            nik_ketua: nik_ketua.unwrap(),
            email_ketua: email_ketua.unwrap(),
            no_hp_ketua: no_hp_ketua.unwrap(),
            jumlah_anggota: jumlah_anggota.unwrap(),
            latitude,
            longitude,
            ktp_ketua: self.file_ktp_ketua.unwrap(),
            ad_art: self.file_ad_art.unwrap(),
            berita_acara: self.file_berita_acara.unwrap(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(len: usize) -> DocumentUpload {
        DocumentUpload {
            file_name: "dokumen.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            data: vec![0u8; len],
        }
    }

    fn filled_form() -> IntakeForm {
        IntakeForm {
            nama_koperasi: Some("Koperasi Sejahtera".to_string()),
            alamat_lengkap: Some("Jl. Pajajaran No. 1, Bogor".to_string()),
            kelurahan: Some("Baranangsiang".to_string()),
            kecamatan: Some("Bogor Timur".to_string()),
            nama_ketua: Some("Budi Santoso".to_string()),
            nik_ketua: Some("3271046504930002".to_string()),
            email_ketua: Some("budi@example.com".to_string()),
            no_hp_ketua: Some("081234567890".to_string()),
            jumlah_anggota: Some("25".to_string()),
            latitude: Some("-6.5976".to_string()),
            longitude: Some("106.7996".to_string()),
            file_ktp_ketua: Some(pdf(1024)),
            file_ad_art: Some(pdf(1024)),
            file_berita_acara: Some(pdf(1024)),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        let validated = filled_form().validate(Vec::new()).unwrap();
        assert_eq!(validated.nama_koperasi, "Koperasi Sejahtera");
        assert_eq!(validated.jumlah_anggota, 25);
        assert_eq!(validated.latitude, -6.5976);
        assert_eq!(validated.longitude, 106.7996);
    }

    #[test]
    fn test_empty_form_reports_every_field_at_once() {
        let errors = IntakeForm::default().validate(Vec::new()).unwrap_err();

        // Ten required fields plus three documents
        assert_eq!(errors.len(), 13);
        assert!(errors.contains(&"Nama koperasi wajib diisi".to_string()));
        assert!(errors.contains(&"Alamat wajib diisi".to_string()));
        assert!(errors.contains(&"Kecamatan wajib dipilih".to_string()));
        assert!(errors.contains(&"Kelurahan wajib diisi".to_string()));
        assert!(errors.contains(&"Nama ketua wajib diisi".to_string()));
        assert!(errors.contains(&"NIK ketua wajib diisi".to_string()));
        assert!(errors.contains(&"Email wajib diisi".to_string()));
        assert!(errors.contains(&"Telepon wajib diisi".to_string()));
        assert!(errors.contains(&"Jumlah anggota wajib diisi".to_string()));
        assert!(errors.contains(&"Lokasi pada peta wajib dipilih".to_string()));
        assert!(errors.contains(&"File KTP wajib diupload".to_string()));
        assert!(errors.contains(&"File AD/ART wajib diupload".to_string()));
        assert!(errors.contains(&"File Berita Acara wajib diupload".to_string()));
    }

    #[test]
    fn test_format_errors_are_field_specific() {
        let mut form = filled_form();
        form.nik_ketua = Some("12345".to_string());
        form.email_ketua = Some("bukan-email".to_string());
        form.no_hp_ketua = Some("abc".to_string());
        form.jumlah_anggota = Some("15".to_string());

        let errors = form.validate(Vec::new()).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&"NIK harus terdiri dari 16 digit".to_string()));
        assert!(errors.contains(&"Format email tidak valid".to_string()));
        assert!(errors.contains(&"Format nomor telepon tidak valid".to_string()));
        assert!(errors.contains(&"Jumlah anggota minimal 20".to_string()));
    }

    #[test]
    fn test_half_selected_location_is_rejected() {
        let mut form = filled_form();
        form.longitude = None;

        let errors = form.validate(Vec::new()).unwrap_err();
        assert_eq!(errors, vec!["Lokasi pada peta wajib dipilih".to_string()]);
    }

    #[test]
    fn test_file_errors_are_prepended() {
        let mut form = filled_form();
        form.file_ktp_ketua = None;

        let errors = form
            .validate(vec!["KTP Ketua: Ukuran file maksimal 5MB".to_string()])
            .unwrap_err();
        assert_eq!(errors[0], "KTP Ketua: Ukuran file maksimal 5MB");
        assert!(errors.contains(&"File KTP wajib diupload".to_string()));
    }

    #[test]
    fn test_check_document_size_and_type() {
        // 6 MiB PDF: rejected
        assert_eq!(
            check_document(&pdf(6 * 1024 * 1024)).unwrap_err(),
            "Ukuran file maksimal 5MB"
        );

        // 1 MiB docx: rejected
        let docx = DocumentUpload {
            file_name: "akta.docx".to_string(),
            content_type:
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                    .to_string(),
            data: vec![0u8; 1024 * 1024],
        };
        assert_eq!(
            check_document(&docx).unwrap_err(),
            "Format file harus PDF, JPG, JPEG, atau PNG"
        );

        // 1 MiB PDF and 2 MiB JPEG: accepted
        assert!(check_document(&pdf(1024 * 1024)).is_ok());
        let jpeg = DocumentUpload {
            file_name: "ktp.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            data: vec![0u8; 2 * 1024 * 1024],
        };
        assert!(check_document(&jpeg).is_ok());
    }
}
