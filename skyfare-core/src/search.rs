use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Calendar date layout used in query strings, cache keys and offer payloads.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A validated one-way search. Only produced by [`crate::validation::parse_search`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightSearch {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub adults: u8,
    pub non_stop: bool,
}

impl FlightSearch {
    pub fn departure_date_str(&self) -> String {
        self.departure_date.format(DATE_FORMAT).to_string()
    }
}

/// One priced itinerary as reported by a provider, normalized to a common shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOffer {
    pub provider: String,
    pub price: f64,
    /// Simplified ISO-8601 duration, e.g. `PT3H30M`.
    pub duration: String,
    pub origin: String,
    pub destination: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub cheapest: FlightOffer,
    pub fastest: FlightOffer,
    pub providers: HashMap<String, Vec<FlightOffer>>,
}
