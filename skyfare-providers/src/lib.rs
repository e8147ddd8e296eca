//! Upstream flight-data providers and the concurrent fan-out over them.

pub mod aggregator;
pub mod amadeus;
mod http;
pub mod mock;
pub mod priceline;
pub mod serpapi;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregator::{FanOutResult, FlightAggregator, ProviderFailure};
pub use amadeus::AmadeusClient;
pub use mock::MockProvider;
pub use priceline::PriceLineClient;
pub use serpapi::SerpApiClient;
