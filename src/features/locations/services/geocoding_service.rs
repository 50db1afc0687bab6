use async_trait::async_trait;
use serde::Deserialize;

use crate::core::config::GeocodingConfig;

/// Bounding box of Kota Bogor used to constrain forward searches
const BOGOR_VIEWBOX: &str = "106.6,106.9,-6.4,-6.8";

/// Suffix appended to free-text queries to keep results in the city
const QUERY_SUFFIX: &str = " Bogor";

/// Maximum number of ranked candidates returned per search
const RESULT_LIMIT: usize = 5;

/// Nominatim API response structure
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

/// Nominatim reverse lookup response structure
#[derive(Debug, Deserialize)]
struct NominatimReverse {
    display_name: Option<String>,
}

/// A ranked forward-geocoding candidate
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeCandidate {
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl NominatimPlace {
    fn into_candidate(self) -> Option<GeocodeCandidate> {
        let latitude = self.lat.parse().ok()?;
        let longitude = self.lon.parse().ok()?;
        Some(GeocodeCandidate {
            display_name: self.display_name,
            latitude,
            longitude,
        })
    }
}

/// Seam between the location picker and the geocoding backend.
///
/// Both operations fail open: a search that cannot reach the service
/// yields an empty candidate list and a failed reverse lookup yields
/// `None`, so callers fall back to the raw coordinate label.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Forward geocode a free-text query, bounded to the city of interest
    async fn search(&self, query: &str) -> Vec<GeocodeCandidate>;

    /// Resolve a coordinate to a display address
    async fn reverse(&self, latitude: f64, longitude: f64) -> Option<String>;
}

/// Geocoder backed by the public Nominatim HTTP API
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(config: GeocodingConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(config.user_agent)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: config.base_url,
        }
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn search(&self, query: &str) -> Vec<GeocodeCandidate> {
        let url = format!(
            "{}/search?format=json&q={}&limit={}&addressdetails=1&bounded=1&viewbox={}",
            self.base_url,
            urlencoding::encode(&format!("{}{}", query, QUERY_SUFFIX)),
            RESULT_LIMIT,
            BOGOR_VIEWBOX
        );

        tracing::debug!("Geocoding (forward): {} -> {}", query, url);

        let response = match self.client.get(&url).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::warn!("Nominatim returned status: {}", r.status());
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!("Nominatim search request failed: {}", e);
                return Vec::new();
            }
        };

        let places: Vec<NominatimPlace> = match response.json().await {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("Failed to parse Nominatim response: {}", e);
                return Vec::new();
            }
        };

        places
            .into_iter()
            .filter_map(NominatimPlace::into_candidate)
            .take(RESULT_LIMIT)
            .collect()
    }

    async fn reverse(&self, latitude: f64, longitude: f64) -> Option<String> {
        let url = format!(
            "{}/reverse?format=json&lat={}&lon={}",
            self.base_url, latitude, longitude
        );

        tracing::debug!("Geocoding (reverse): {},{} -> {}", latitude, longitude, url);

        let response = match self.client.get(&url).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::warn!("Nominatim reverse returned status: {}", r.status());
                return None;
            }
            Err(e) => {
                tracing::warn!("Nominatim reverse request failed: {}", e);
                return None;
            }
        };

        match response.json::<NominatimReverse>().await {
            Ok(r) => r.display_name,
            Err(e) => {
                tracing::warn!("Failed to parse Nominatim reverse response: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_parsing_skips_bad_coordinates() {
        let good = NominatimPlace {
            lat: "-6.5976".to_string(),
            lon: "106.7996".to_string(),
            display_name: "Kebun Raya Bogor".to_string(),
        };
        let candidate = good.into_candidate().unwrap();
        assert_eq!(candidate.latitude, -6.5976);
        assert_eq!(candidate.longitude, 106.7996);

        let bad = NominatimPlace {
            lat: "not-a-number".to_string(),
            lon: "106.7996".to_string(),
            display_name: "Rusak".to_string(),
        };
        assert!(bad.into_candidate().is_none());
    }
}
