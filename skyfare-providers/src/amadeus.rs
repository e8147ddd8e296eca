//! Amadeus Self-Service flight offers, authenticated with OAuth2 client credentials.

use crate::http::{build_client, decode_json, transport_error, trim_base_url};
use async_trait::async_trait;
use serde::Deserialize;
use skyfare_core::{FlightOffer, FlightProvider, FlightSearch, ProviderError};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};

const PROVIDER_NAME: &str = "Amadeus";
const TOKEN_ENDPOINT: &str = "/v1/security/oauth2/token";
const OFFERS_ENDPOINT: &str = "/v2/shopping/flight-offers";
/// Tokens are replaced this long before the expiry Amadeus reports.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(30);

// ============================================================================
// Upstream payloads
// ============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AmadeusFlightResponse {
    data: Vec<AmadeusFlightOffer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AmadeusFlightOffer {
    itineraries: Vec<AmadeusItinerary>,
    price: AmadeusPrice,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AmadeusPrice {
    total: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AmadeusItinerary {
    duration: String,
    segments: Vec<AmadeusSegment>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AmadeusSegment {
    departure: AmadeusLocation,
    arrival: AmadeusLocation,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AmadeusLocation {
    iata_code: String,
    at: String,
}

// ============================================================================
// Client
// ============================================================================

struct AccessToken {
    value: String,
    refresh_at: Instant,
}

pub struct AmadeusClient {
    api_key: String,
    api_secret: String,
    base_url: String,
    max_results: u32,
    http: reqwest::Client,
    // Held across a refresh so concurrent searches share one token request.
    token: Mutex<Option<AccessToken>>,
}

impl AmadeusClient {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        base_url: &str,
        max_results: u32,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            base_url: trim_base_url(base_url),
            max_results,
            http: build_client(timeout)?,
            token: Mutex::new(None),
        })
    }

    async fn access_token(&self) -> Result<String, ProviderError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }

        let fresh = self.request_token().await.map_err(|e| ProviderError::Auth {
            provider: PROVIDER_NAME.to_string(),
            message: e.detail(),
        })?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    async fn request_token(&self) -> Result<AccessToken, ProviderError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.api_key.as_str()),
            ("client_secret", self.api_secret.as_str()),
        ];

        let response = self
            .http
            .post(format!("{}{}", self.base_url, TOKEN_ENDPOINT))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&form)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER_NAME, e))?;

        let token: TokenResponse = decode_json(PROVIDER_NAME, response).await?;
        info!("Obtained Amadeus access token (expires in {}s)", token.expires_in);

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_REFRESH_MARGIN);
        Ok(AccessToken {
            value: token.access_token,
            refresh_at: Instant::now() + lifetime,
        })
    }

    async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }
}

#[async_trait]
impl FlightProvider for AmadeusClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch(&self, search: &FlightSearch) -> Result<Vec<FlightOffer>, ProviderError> {
        let token = self.access_token().await?;

        let query = [
            ("originLocationCode", search.origin.clone()),
            ("destinationLocationCode", search.destination.clone()),
            ("departureDate", search.departure_date_str()),
            ("adults", search.adults.to_string()),
            ("nonStop", search.non_stop.to_string()),
            ("max", self.max_results.to_string()),
        ];

        let response = self
            .http
            .get(format!("{}{}", self.base_url, OFFERS_ENDPOINT))
            .header(reqwest::header::ACCEPT, "application/json")
            .bearer_auth(token)
            .query(&query)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER_NAME, e))?;

        let body: AmadeusFlightResponse = match decode_json(PROVIDER_NAME, response).await {
            Ok(body) => body,
            Err(err @ ProviderError::Status { status: 401, .. }) => {
                // Revoked early; the next search fetches a new token.
                self.invalidate_token().await;
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        let offers = map_offers(body.data);
        debug!("Amadeus returned {} offers", offers.len());
        Ok(offers)
    }
}

/// Flatten each offer to its first itinerary's first segment.
fn map_offers(data: Vec<AmadeusFlightOffer>) -> Vec<FlightOffer> {
    data.into_iter()
        .filter_map(|offer| {
            let itinerary = offer.itineraries.into_iter().next()?;
            let segment = itinerary.segments.into_iter().next()?;
            let date = segment
                .departure
                .at
                .get(..10)
                .unwrap_or(&segment.departure.at)
                .to_string();

            Some(FlightOffer {
                provider: PROVIDER_NAME.to_string(),
                price: parse_price(&offer.price.total),
                duration: itinerary.duration,
                origin: segment.departure.iata_code,
                destination: segment.arrival.iata_code,
                date,
            })
        })
        .collect()
}

/// Unparseable or negative totals become 0 instead of dropping the offer.
fn parse_price(total: &str) -> f64 {
    total
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
        .unwrap_or(0.0)
}
