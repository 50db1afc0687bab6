//! Location resolution feature.
//!
//! Wraps the Nominatim geocoding API (forward search bounded to Kota
//! Bogor, reverse lookup) and hosts the location picker state machine
//! that drives the map-based point selection used by the intake form and
//! the registry screens.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/lokasi/search` | No | Bounded forward geocode (max 5 candidates) |
//! | GET | `/api/lokasi/reverse` | No | Reverse geocode with coordinate fallback |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::{Geocoder, LocationPicker, NominatimClient};
