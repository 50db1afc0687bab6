//! Location resolution routes

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::locations::handlers;
use crate::features::locations::services::Geocoder;

/// Public geocoding routes; the geocoder is injected behind its trait so
/// tests can drive the handlers without the real service
pub fn routes(geocoder: Arc<dyn Geocoder>) -> Router {
    Router::new()
        .route("/api/lokasi/search", get(handlers::search_location))
        .route("/api/lokasi/reverse", get(handlers::reverse_location))
        .with_state(geocoder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::locations::services::GeocodeCandidate;
    use async_trait::async_trait;
    use axum_test::TestServer;
    use serde_json::Value;
    use std::sync::Mutex;

    struct MockGeocoder {
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl Geocoder for MockGeocoder {
        async fn search(&self, _query: &str) -> Vec<GeocodeCandidate> {
            *self.calls.lock().unwrap() += 1;
            vec![GeocodeCandidate {
                display_name: "Kebun Raya Bogor".to_string(),
                latitude: -6.5976,
                longitude: 106.7996,
            }]
        }

        async fn reverse(&self, _latitude: f64, _longitude: f64) -> Option<String> {
            None
        }
    }

    #[tokio::test]
    async fn test_short_query_returns_empty_without_upstream_call() {
        let geocoder = Arc::new(MockGeocoder {
            calls: Mutex::new(0),
        });
        let server = TestServer::new(routes(geocoder.clone())).unwrap();

        let response = server.get("/api/lokasi/search").add_query_param("q", "ab").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().unwrap().len(), 0);
        assert_eq!(*geocoder.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_returns_candidates() {
        let geocoder = Arc::new(MockGeocoder {
            calls: Mutex::new(0),
        });
        let server = TestServer::new(routes(geocoder.clone())).unwrap();

        let response = server
            .get("/api/lokasi/search")
            .add_query_param("q", "kebun raya")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["data"][0]["location"], "Kebun Raya Bogor");
        assert_eq!(*geocoder.calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_reverse_falls_back_to_coordinate_label() {
        let geocoder = Arc::new(MockGeocoder {
            calls: Mutex::new(0),
        });
        let server = TestServer::new(routes(geocoder)).unwrap();

        let response = server
            .get("/api/lokasi/reverse")
            .add_query_param("lat", "-6.6")
            .add_query_param("lon", "106.8")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["data"]["location"], "-6.600000, 106.800000");
        assert_eq!(body["data"]["latitude"], -6.6);
    }
}
