//! SerpAPI's Google Flights engine.

use crate::http::{build_client, decode_json, transport_error, trim_base_url};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Deserialize;
use skyfare_core::duration::format_minutes;
use skyfare_core::search::DATE_FORMAT;
use skyfare_core::{FlightOffer, FlightProvider, FlightSearch, ProviderError};
use std::time::Duration;
use tracing::{debug, warn};

const PROVIDER_NAME: &str = "SerpAPI";
const SEARCH_ENDPOINT: &str = "/search.json";
const ENGINE: &str = "google_flights";
const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_LOCALE: &str = "en";
/// Segment timestamps look like `2030-05-02 10:00`.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SerpApiResponse {
    best_flights: Vec<SerpFlightOption>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SerpFlightOption {
    flights: Vec<SerpSegment>,
    total_duration: u64,
    price: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SerpSegment {
    departure_airport: SerpAirport,
    arrival_airport: SerpAirport,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SerpAirport {
    id: String,
    time: String,
}

pub struct SerpApiClient {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

impl SerpApiClient {
    pub fn new(api_key: impl Into<String>, base_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            base_url: trim_base_url(base_url),
            http: build_client(timeout)?,
        })
    }
}

#[async_trait]
impl FlightProvider for SerpApiClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch(&self, search: &FlightSearch) -> Result<Vec<FlightOffer>, ProviderError> {
        let return_date = search.departure_date.succ_opt().unwrap_or(search.departure_date);

        let query = [
            ("engine", ENGINE.to_string()),
            ("currency", DEFAULT_CURRENCY.to_string()),
            ("hl", DEFAULT_LOCALE.to_string()),
            ("api_key", self.api_key.clone()),
            ("departure_id", search.origin.clone()),
            ("arrival_id", search.destination.clone()),
            ("outbound_date", search.departure_date_str()),
            ("return_date", return_date.format(DATE_FORMAT).to_string()),
        ];

        let response = self
            .http
            .get(format!("{}{}", self.base_url, SEARCH_ENDPOINT))
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&query)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER_NAME, e))?;

        let body: SerpApiResponse = decode_json(PROVIDER_NAME, response).await?;
        if body.best_flights.is_empty() {
            return Err(ProviderError::NoOffers {
                provider: PROVIDER_NAME.to_string(),
            });
        }

        let offers: Vec<FlightOffer> = body
            .best_flights
            .into_iter()
            .filter_map(|option| match map_offer(option) {
                Ok(offer) => Some(offer),
                Err(reason) => {
                    warn!("Skipping SerpAPI flight option: {}", reason);
                    None
                }
            })
            .collect();

        debug!("SerpAPI returned {} offers", offers.len());
        Ok(offers)
    }
}

fn map_offer(option: SerpFlightOption) -> Result<FlightOffer, String> {
    let (first, last) = match (option.flights.first(), option.flights.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err("no flight segments found".to_string()),
    };

    let departed = NaiveDateTime::parse_from_str(&first.departure_airport.time, TIME_FORMAT)
        .map_err(|e| format!("parsing date {:?}: {}", first.departure_airport.time, e))?;

    Ok(FlightOffer {
        provider: PROVIDER_NAME.to_string(),
        price: option.price,
        duration: format_minutes(option.total_duration),
        origin: first.departure_airport.id.clone(),
        destination: last.arrival_airport.id.clone(),
        date: departed.date().format(DATE_FORMAT).to_string(),
    })
}
