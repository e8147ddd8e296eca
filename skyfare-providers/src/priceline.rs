//! PriceLine one-way search, served through RapidAPI.

use crate::http::{build_client, decode_json, transport_error, trim_base_url};
use async_trait::async_trait;
use serde::Deserialize;
use skyfare_core::duration::{format_minutes, minutes_str_to_iso};
use skyfare_core::{FlightOffer, FlightProvider, FlightSearch, ProviderError};
use std::time::Duration;
use tracing::debug;

const PROVIDER_NAME: &str = "PriceLine";
const SEARCH_ENDPOINT: &str = "/flights/search-one-way";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PriceLineResponse {
    data: PriceLineData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PriceLineData {
    listings: Vec<Listing>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Listing {
    total_price_with_decimal: TotalPrice,
    slices: Vec<Slice>,
    airlines: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TotalPrice {
    price: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Slice {
    /// Usually a numeric string; tolerated as a bare number too.
    duration_in_minutes: serde_json::Value,
    segments: Vec<Segment>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Segment {
    depart_info: DepartInfo,
    arrival_info: ArrivalInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DepartInfo {
    airport: Airport,
    time: Time,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ArrivalInfo {
    airport: Airport,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Airport {
    code: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Time {
    date_time: String,
}

pub struct PriceLineClient {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

impl PriceLineClient {
    pub fn new(api_key: impl Into<String>, base_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            base_url: trim_base_url(base_url),
            http: build_client(timeout)?,
        })
    }
}

#[async_trait]
impl FlightProvider for PriceLineClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch(&self, search: &FlightSearch) -> Result<Vec<FlightOffer>, ProviderError> {
        let url = reqwest::Url::parse(&format!("{}{}", self.base_url, SEARCH_ENDPOINT)).map_err(|e| {
            ProviderError::Transport {
                provider: PROVIDER_NAME.to_string(),
                message: format!("invalid base URL {:?}: {}", self.base_url, e),
            }
        })?;
        let host = url.host_str().unwrap_or_default().to_string();

        let query = [
            ("originAirportCode", search.origin.clone()),
            ("destinationAirportCode", search.destination.clone()),
            ("departureDate", search.departure_date_str()),
        ];

        let response = self
            .http
            .get(url)
            .header("x-rapidapi-host", host)
            .header("x-rapidapi-key", &self.api_key)
            .query(&query)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER_NAME, e))?;

        let body: PriceLineResponse = decode_json(PROVIDER_NAME, response).await?;
        if body.data.listings.is_empty() {
            return Err(ProviderError::NoOffers {
                provider: PROVIDER_NAME.to_string(),
            });
        }

        let offers = map_listings(body.data.listings);
        debug!("PriceLine returned {} offers", offers.len());
        Ok(offers)
    }
}

fn map_listings(listings: Vec<Listing>) -> Vec<FlightOffer> {
    listings
        .into_iter()
        .filter(|listing| !listing.airlines.is_empty())
        .filter_map(|listing| {
            let price = listing.total_price_with_decimal.price;
            let slice = listing.slices.into_iter().next()?;
            let duration = duration_to_iso(&slice.duration_in_minutes);
            let segment = slice.segments.into_iter().next()?;
            let date_time = segment.depart_info.time.date_time;

            Some(FlightOffer {
                provider: PROVIDER_NAME.to_string(),
                price,
                duration,
                origin: segment.depart_info.airport.code,
                destination: segment.arrival_info.airport.code,
                date: date_time.get(..10).unwrap_or(&date_time).to_string(),
            })
        })
        .collect()
}

/// Malformed minute values become `PT0H0M` rather than failing the listing.
fn duration_to_iso(minutes: &serde_json::Value) -> String {
    match minutes {
        serde_json::Value::String(s) => minutes_str_to_iso(s),
        serde_json::Value::Number(n) => format_minutes(n.as_u64().unwrap_or(0)),
        _ => format_minutes(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{jfk_lax, spawn_upstream};
    use axum::{http::HeaderMap, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
    use serde_json::json;

    fn listing(price: f64, minutes: serde_json::Value, airlines: bool) -> serde_json::Value {
        json!({
            "totalPriceWithDecimal": {"price": price},
            "slices": [{
                "durationInMinutes": minutes,
                "segments": [{
                    "departInfo": {"airport": {"code": "JFK"}, "time": {"dateTime": "2030-05-02T08:00:00"}},
                    "arrivalInfo": {"airport": {"code": "LAX"}}
                }]
            }],
            "airlines": if airlines { json!([{"name": "Delta"}]) } else { json!([]) }
        })
    }

    fn router(listings: Vec<serde_json::Value>) -> Router {
        let body = json!({"data": {"listings": listings}});
        Router::new().route(
            SEARCH_ENDPOINT,
            get(move |headers: HeaderMap| {
                let body = body.clone();
                async move {
                    if headers.get("x-rapidapi-key").and_then(|h| h.to_str().ok()) != Some("rapid-key") {
                        return (StatusCode::UNAUTHORIZED, "missing key").into_response();
                    }
                    Json(body).into_response()
                }
            }),
        )
    }

    #[tokio::test]
    async fn test_fetch_maps_listings() {
        let base = spawn_upstream(router(vec![
            listing(245.5, json!("335"), true),
            listing(99.0, json!("oops"), true),
            listing(10.0, json!("60"), false),
            listing(180.0, json!(95), true),
        ]))
        .await;
        let client = PriceLineClient::new("rapid-key", &base, Duration::from_secs(5)).unwrap();

        let offers = client.fetch(&jfk_lax()).await.expect("fetch should succeed");

        // The listing without airlines is skipped.
        assert_eq!(offers.len(), 3);
        assert_eq!(offers[0].provider, "PriceLine");
        assert_eq!(offers[0].price, 245.5);
        assert_eq!(offers[0].duration, "PT5H35M");
        assert_eq!(offers[0].origin, "JFK");
        assert_eq!(offers[0].destination, "LAX");
        assert_eq!(offers[0].date, "2030-05-02");
        assert_eq!(offers[1].duration, "PT0H0M");
        assert_eq!(offers[2].duration, "PT1H35M");
    }

    #[tokio::test]
    async fn test_empty_result_is_no_offers() {
        let base = spawn_upstream(router(vec![])).await;
        let client = PriceLineClient::new("rapid-key", &base, Duration::from_secs(5)).unwrap();

        let err = client.fetch(&jfk_lax()).await.unwrap_err();
        assert_eq!(err, ProviderError::NoOffers { provider: "PriceLine".to_string() });
    }

    #[tokio::test]
    async fn test_rejected_key() {
        let base = spawn_upstream(router(vec![listing(1.0, json!("1"), true)])).await;
        let client = PriceLineClient::new("wrong", &base, Duration::from_secs(5)).unwrap();

        let err = client.fetch(&jfk_lax()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 401, .. }), "{err:?}");
    }
}
