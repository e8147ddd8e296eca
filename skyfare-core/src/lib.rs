pub mod duration;
pub mod iata;
pub mod provider;
pub mod repository;
pub mod search;
pub mod synthesis;
pub mod validation;

pub use provider::{FlightProvider, ProviderError};
pub use repository::{OfferStore, StoreError};
pub use search::{FlightOffer, FlightSearch, SearchResponse};
pub use synthesis::build_search_response;
pub use validation::{parse_search, ValidationError};
