//! Map-based location picker.
//!
//! An explicit state machine replacing the ad hoc timer/callback wiring of
//! a map widget: free-text search is debounced and bounded, a direct map
//! click resolves through reverse geocoding with a coordinate-string
//! fallback, and a newer query or click supersedes and cancels any earlier
//! in-flight request. The debounced search is the only cancellable
//! in-flight operation in the whole service.
//!
//! The picker is driven over channels so any frontend can consume it:
//! feed [`PickerEvent`]s in, receive [`PickerOutput`]s back.

#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use crate::features::locations::services::geocoding_service::{GeocodeCandidate, Geocoder};
use crate::features::locations::services::map_view::{MapView, SELECTED_ZOOM};

/// Input inactivity window before a search is issued
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Queries shorter than this clear results without issuing a request
pub const MIN_QUERY_LEN: usize = 3;

/// Raw coordinate label used before (or instead of) a resolved address
pub fn format_coordinate_label(latitude: f64, longitude: f64) -> String {
    format!("{:.6}, {:.6}", latitude, longitude)
}

/// A resolved `{location, latitude, longitude}` triple
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedLocation {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Events fed into the picker by the consuming frontend
#[derive(Debug, Clone)]
pub enum PickerEvent {
    /// The search box content changed
    QueryChanged(String),
    /// A shown candidate was chosen (by index)
    CandidateChosen(usize),
    /// The map was clicked directly
    MapClicked { latitude: f64, longitude: f64 },
    /// The picker is re-entered with a pre-existing value (editing an
    /// existing record); re-centers without issuing a search
    ValueRestored {
        latitude: f64,
        longitude: f64,
        label: String,
    },
}

/// Outputs emitted back to the consuming frontend
#[derive(Debug, Clone, PartialEq)]
pub enum PickerOutput {
    /// The candidate list was cleared (short or superseded query)
    ResultsCleared,
    /// Ranked candidates for the current query
    ResultsShown(Vec<GeocodeCandidate>),
    /// A point was selected; emitted again when a provisional coordinate
    /// label is upgraded to a resolved address
    LocationSelected(SelectedLocation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerState {
    Idle,
    Searching,
    ResultsShown,
    Resolving,
    Selected,
}

type PendingFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type PendingSearch = PendingFuture<(u64, Vec<GeocodeCandidate>)>;
type PendingReverse = PendingFuture<(u64, f64, f64, Option<String>)>;

/// Await the slot if occupied, otherwise park forever (the owning select
/// loop clears the slot once the future completes)
async fn pending_slot<T>(slot: &mut Option<PendingFuture<T>>) -> T {
    match slot.as_mut() {
        Some(fut) => fut.await,
        None => std::future::pending().await,
    }
}

pub struct LocationPicker {
    geocoder: Arc<dyn Geocoder>,
    events: mpsc::Receiver<PickerEvent>,
    outputs: mpsc::Sender<PickerOutput>,
    state: PickerState,
    query: String,
    results: Vec<GeocodeCandidate>,
    map: MapView,
    /// Bumped by every superseding event; stale completions are dropped
    generation: u64,
}

impl LocationPicker {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
    ) -> (
        mpsc::Sender<PickerEvent>,
        mpsc::Receiver<PickerOutput>,
        Self,
    ) {
        let (event_tx, event_rx) = mpsc::channel(16);
        let (output_tx, output_rx) = mpsc::channel(16);

        let picker = Self {
            geocoder,
            events: event_rx,
            outputs: output_tx,
            state: PickerState::Idle,
            query: String::new(),
            results: Vec::new(),
            map: MapView::new(),
            generation: 0,
        };

        (event_tx, output_rx, picker)
    }

    /// Spawn the picker onto the runtime and return its channel ends
    pub fn spawn(
        geocoder: Arc<dyn Geocoder>,
    ) -> (mpsc::Sender<PickerEvent>, mpsc::Receiver<PickerOutput>) {
        let (event_tx, output_rx, picker) = Self::new(geocoder);
        tokio::spawn(picker.run());
        (event_tx, output_rx)
    }

    pub fn state(&self) -> PickerState {
        self.state
    }

    pub fn map(&self) -> &MapView {
        &self.map
    }

    /// Drive the state machine until the event channel closes
    pub async fn run(mut self) {
        let mut debounce: Option<Instant> = None;
        let mut search: Option<PendingSearch> = None;
        let mut reverse: Option<PendingReverse> = None;

        loop {
            tokio::select! {
                event = self.events.recv() => {
                    let Some(event) = event else { break };
                    self.handle_event(event, &mut debounce, &mut search, &mut reverse)
                        .await;
                }
                _ = sleep_until(debounce.unwrap_or_else(Instant::now)), if debounce.is_some() => {
                    debounce = None;
                    let generation = self.generation;
                    let query = self.query.clone();
                    let geocoder = Arc::clone(&self.geocoder);
                    search = Some(Box::pin(async move {
                        (generation, geocoder.search(&query).await)
                    }));
                }
                (generation, results) = pending_slot(&mut search) => {
                    search = None;
                    if generation == self.generation {
                        self.results = results.clone();
                        self.state = PickerState::ResultsShown;
                        let _ = self.outputs.send(PickerOutput::ResultsShown(results)).await;
                    }
                }
                (generation, latitude, longitude, resolved) = pending_slot(&mut reverse) => {
                    reverse = None;
                    if generation == self.generation {
                        // Fail-open: a failed reverse lookup keeps the
                        // provisional coordinate label, no error surfaced
                        if let Some(address) = resolved {
                            self.map.relabel_marker(address.clone());
                            self.query = address.clone();
                            let _ = self
                                .outputs
                                .send(PickerOutput::LocationSelected(SelectedLocation {
                                    location: address,
                                    latitude,
                                    longitude,
                                }))
                                .await;
                        }
                        self.state = PickerState::Selected;
                    }
                }
            }
        }
    }

    async fn handle_event(
        &mut self,
        event: PickerEvent,
        debounce: &mut Option<Instant>,
        search: &mut Option<PendingSearch>,
        reverse: &mut Option<PendingReverse>,
    ) {
        match event {
            PickerEvent::QueryChanged(query) => {
                // A newer keystroke supersedes and cancels any earlier
                // pending debounce or in-flight request
                self.generation += 1;
                *search = None;
                *reverse = None;
                self.query = query;

                if self.query.trim().chars().count() < MIN_QUERY_LEN {
                    *debounce = None;
                    self.results.clear();
                    self.state = PickerState::Idle;
                    let _ = self.outputs.send(PickerOutput::ResultsCleared).await;
                } else {
                    self.state = PickerState::Searching;
                    *debounce = Some(Instant::now() + SEARCH_DEBOUNCE);
                }
            }
            PickerEvent::CandidateChosen(index) => {
                let Some(candidate) = self.results.get(index).cloned() else {
                    return;
                };

                self.generation += 1;
                *debounce = None;
                *search = None;
                *reverse = None;

                self.map
                    .center_on(candidate.latitude, candidate.longitude, SELECTED_ZOOM);
                self.map.place_marker(
                    candidate.latitude,
                    candidate.longitude,
                    candidate.display_name.clone(),
                );
                self.results.clear();
                self.query = candidate.display_name.clone();
                self.state = PickerState::Selected;

                let _ = self
                    .outputs
                    .send(PickerOutput::LocationSelected(SelectedLocation {
                        location: candidate.display_name,
                        latitude: candidate.latitude,
                        longitude: candidate.longitude,
                    }))
                    .await;
            }
            PickerEvent::MapClicked {
                latitude,
                longitude,
            } => {
                self.generation += 1;
                *debounce = None;
                *search = None;
                *reverse = None;

                let label = format_coordinate_label(latitude, longitude);
                self.map.center_on(latitude, longitude, SELECTED_ZOOM);
                self.map.place_marker(latitude, longitude, label.clone());
                self.results.clear();

                // Provisional selection with the raw coordinate string;
                // upgraded asynchronously if the reverse lookup succeeds
                let _ = self
                    .outputs
                    .send(PickerOutput::LocationSelected(SelectedLocation {
                        location: label,
                        latitude,
                        longitude,
                    }))
                    .await;

                self.state = PickerState::Resolving;
                let generation = self.generation;
                let geocoder = Arc::clone(&self.geocoder);
                *reverse = Some(Box::pin(async move {
                    (
                        generation,
                        latitude,
                        longitude,
                        geocoder.reverse(latitude, longitude).await,
                    )
                }));
            }
            PickerEvent::ValueRestored {
                latitude,
                longitude,
                label,
            } => {
                self.generation += 1;
                *debounce = None;
                *search = None;
                *reverse = None;

                self.map.center_on(latitude, longitude, SELECTED_ZOOM);
                self.map.place_marker(latitude, longitude, label.clone());
                self.query = label;
                self.results.clear();
                self.state = PickerState::Selected;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockGeocoder {
        calls: Mutex<Vec<String>>,
        results: Vec<GeocodeCandidate>,
        reverse_result: Option<String>,
    }

    impl MockGeocoder {
        fn new(results: Vec<GeocodeCandidate>, reverse_result: Option<String>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                results,
                reverse_result,
            })
        }

        fn search_calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Geocoder for MockGeocoder {
        async fn search(&self, query: &str) -> Vec<GeocodeCandidate> {
            self.calls.lock().unwrap().push(query.to_string());
            self.results.clone()
        }

        async fn reverse(&self, _latitude: f64, _longitude: f64) -> Option<String> {
            self.reverse_result.clone()
        }
    }

    fn kebun_raya() -> GeocodeCandidate {
        GeocodeCandidate {
            display_name: "Kebun Raya Bogor, Bogor Tengah".to_string(),
            latitude: -6.5976,
            longitude: 106.7996,
        }
    }

    async fn recv(
        outputs: &mut mpsc::Receiver<PickerOutput>,
    ) -> PickerOutput {
        tokio::time::timeout(Duration::from_secs(5), outputs.recv())
            .await
            .expect("picker output timed out")
            .expect("picker output channel closed")
    }

    #[tokio::test]
    async fn test_short_query_clears_results_without_network_call() {
        let geocoder = MockGeocoder::new(vec![kebun_raya()], None);
        let (_tx, mut outputs, mut picker) = LocationPicker::new(geocoder.clone());

        let mut debounce = None;
        let mut search = None;
        let mut reverse = None;
        picker
            .handle_event(
                PickerEvent::QueryChanged("ab".to_string()),
                &mut debounce,
                &mut search,
                &mut reverse,
            )
            .await;

        assert_eq!(picker.state(), PickerState::Idle);
        assert!(debounce.is_none());
        assert_eq!(recv(&mut outputs).await, PickerOutput::ResultsCleared);
        assert!(geocoder.search_calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_is_debounced_and_bounded() {
        let geocoder = MockGeocoder::new(vec![kebun_raya()], None);
        let (events, mut outputs) = LocationPicker::spawn(geocoder.clone());

        events
            .send(PickerEvent::QueryChanged("kebun raya".to_string()))
            .await
            .unwrap();

        match recv(&mut outputs).await {
            PickerOutput::ResultsShown(results) => {
                assert_eq!(results.len(), 1);
                assert_eq!(results[0], kebun_raya());
            }
            other => panic!("expected ResultsShown, got {:?}", other),
        }

        assert_eq!(geocoder.search_calls(), vec!["kebun raya".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_keystroke_supersedes_pending_search() {
        let geocoder = MockGeocoder::new(vec![kebun_raya()], None);
        let (events, mut outputs) = LocationPicker::spawn(geocoder.clone());

        events
            .send(PickerEvent::QueryChanged("kebun".to_string()))
            .await
            .unwrap();
        events
            .send(PickerEvent::QueryChanged("kebun raya bogor".to_string()))
            .await
            .unwrap();

        match recv(&mut outputs).await {
            PickerOutput::ResultsShown(_) => {}
            other => panic!("expected ResultsShown, got {:?}", other),
        }

        // Only the superseding query reached the geocoder
        assert_eq!(
            geocoder.search_calls(),
            vec!["kebun raya bogor".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_candidate_selection_emits_location() {
        let geocoder = MockGeocoder::new(vec![kebun_raya()], None);
        let (events, mut outputs) = LocationPicker::spawn(geocoder);

        events
            .send(PickerEvent::QueryChanged("kebun raya".to_string()))
            .await
            .unwrap();
        match recv(&mut outputs).await {
            PickerOutput::ResultsShown(_) => {}
            other => panic!("expected ResultsShown, got {:?}", other),
        }

        events.send(PickerEvent::CandidateChosen(0)).await.unwrap();
        assert_eq!(
            recv(&mut outputs).await,
            PickerOutput::LocationSelected(SelectedLocation {
                location: "Kebun Raya Bogor, Bogor Tengah".to_string(),
                latitude: -6.5976,
                longitude: 106.7996,
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_map_click_emits_provisional_then_resolved() {
        let geocoder =
            MockGeocoder::new(Vec::new(), Some("Jl. Pajajaran, Bogor Utara".to_string()));
        let (events, mut outputs) = LocationPicker::spawn(geocoder);

        events
            .send(PickerEvent::MapClicked {
                latitude: -6.6,
                longitude: 106.8,
            })
            .await
            .unwrap();

        assert_eq!(
            recv(&mut outputs).await,
            PickerOutput::LocationSelected(SelectedLocation {
                location: "-6.600000, 106.800000".to_string(),
                latitude: -6.6,
                longitude: 106.8,
            })
        );
        assert_eq!(
            recv(&mut outputs).await,
            PickerOutput::LocationSelected(SelectedLocation {
                location: "Jl. Pajajaran, Bogor Utara".to_string(),
                latitude: -6.6,
                longitude: 106.8,
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_map_click_keeps_coordinate_label_when_reverse_fails() {
        let geocoder = MockGeocoder::new(Vec::new(), None);
        let (events, mut outputs) = LocationPicker::spawn(geocoder);

        events
            .send(PickerEvent::MapClicked {
                latitude: -6.6,
                longitude: 106.8,
            })
            .await
            .unwrap();

        assert_eq!(
            recv(&mut outputs).await,
            PickerOutput::LocationSelected(SelectedLocation {
                location: "-6.600000, 106.800000".to_string(),
                latitude: -6.6,
                longitude: 106.8,
            })
        );

        // Fail-open: no second output, no error
        let no_more = tokio::time::timeout(Duration::from_secs(2), outputs.recv()).await;
        assert!(no_more.is_err());
    }

    #[tokio::test]
    async fn test_marker_invariant_and_restore() {
        let geocoder = MockGeocoder::new(Vec::new(), None);
        let (_tx, mut outputs, mut picker) = LocationPicker::new(geocoder.clone());

        let mut debounce = None;
        let mut search = None;
        let mut reverse = None;

        picker
            .handle_event(
                PickerEvent::MapClicked {
                    latitude: -6.6,
                    longitude: 106.8,
                },
                &mut debounce,
                &mut search,
                &mut reverse,
            )
            .await;
        let _ = recv(&mut outputs).await;
        assert_eq!(picker.map().marker_count(), 1);

        picker
            .handle_event(
                PickerEvent::MapClicked {
                    latitude: -6.61,
                    longitude: 106.81,
                },
                &mut debounce,
                &mut search,
                &mut reverse,
            )
            .await;
        let _ = recv(&mut outputs).await;
        assert_eq!(picker.map().marker_count(), 1);

        // Re-entering with a stored value re-centers and shows the marker
        // without a search and without emitting a change
        picker
            .handle_event(
                PickerEvent::ValueRestored {
                    latitude: -6.62,
                    longitude: 106.82,
                    label: "Alamat tersimpan".to_string(),
                },
                &mut debounce,
                &mut search,
                &mut reverse,
            )
            .await;

        assert_eq!(picker.state(), PickerState::Selected);
        assert_eq!(picker.map().marker_count(), 1);
        assert_eq!(picker.map().marker().unwrap().label, "Alamat tersimpan");
        assert_eq!(picker.map().center(), (-6.62, 106.82));
        assert!(outputs.try_recv().is_err());
        assert!(geocoder.search_calls().is_empty());
    }

    #[test]
    fn test_format_coordinate_label() {
        assert_eq!(format_coordinate_label(-6.6, 106.8), "-6.600000, 106.800000");
    }
}
