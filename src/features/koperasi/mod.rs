//! Cooperative registry feature.
//!
//! Public listing, search, CSV export and map data over the `koperasi`
//! table, plus the admin-facing create/edit/toggle/delete screens.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/koperasi` | No | Filtered, paginated listing |
//! | GET | `/api/koperasi/export` | No | CSV export of the filtered set |
//! | GET | `/api/koperasi/peta` | No | Rows with coordinates for map plotting |
//! | GET | `/api/koperasi/{id}` | No | Single cooperative |
//! | POST | `/api/koperasi` | Yes | Create |
//! | PUT | `/api/koperasi/{id}` | Yes | Update |
//! | PATCH | `/api/koperasi/{id}/status` | Yes | Toggle Aktif/Nonaktif |
//! | DELETE | `/api/koperasi/{id}` | Yes | Hard delete |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::KoperasiService;
