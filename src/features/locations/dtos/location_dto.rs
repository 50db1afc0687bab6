use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::locations::services::{GeocodeCandidate, SelectedLocation};

/// Forward search query
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Free-text query; fewer than 3 characters yields an empty list
    /// without contacting the geocoding service
    pub q: String,
}

/// Reverse lookup query
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ReverseQuery {
    pub lat: f64,
    pub lon: f64,
}

/// A resolved location triple
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LocationDto {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<GeocodeCandidate> for LocationDto {
    fn from(c: GeocodeCandidate) -> Self {
        Self {
            location: c.display_name,
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

impl From<SelectedLocation> for LocationDto {
    fn from(s: SelectedLocation) -> Self {
        Self {
            location: s.location,
            latitude: s.latitude,
            longitude: s.longitude,
        }
    }
}
