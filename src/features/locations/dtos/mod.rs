mod location_dto;

pub use location_dto::{LocationDto, ReverseQuery, SearchQuery};
