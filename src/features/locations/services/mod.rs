mod geocoding_service;
mod location_picker;
mod map_view;

pub use geocoding_service::{GeocodeCandidate, Geocoder, NominatimClient};
pub use location_picker::{
    format_coordinate_label, LocationPicker, PickerEvent, PickerOutput, PickerState,
    SelectedLocation, MIN_QUERY_LEN, SEARCH_DEBOUNCE,
};
pub use map_view::{MapView, Marker};
