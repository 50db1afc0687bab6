/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Sentinel filter value meaning "no filter" on listing endpoints
pub const FILTER_SEMUA: &str = "Semua";

/// Maximum size of an uploaded application document (5 MiB)
pub const MAX_DOCUMENT_SIZE: usize = 5 * 1024 * 1024;

// =============================================================================
// REGION CONSTANTS
// =============================================================================

/// The six kecamatan of Kota Bogor, used for filtering and statistics
pub const KECAMATAN_KOTA_BOGOR: &[&str] = &[
    "Bogor Utara",
    "Bogor Timur",
    "Bogor Tengah",
    "Bogor Barat",
    "Bogor Selatan",
    "Tanah Sareal",
];
