use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    middleware,
    routing::get,
    Json, Router,
};
use skyfare_core::{build_search_response, validation::parse_search_today, SearchResponse};
use skyfare_store::fingerprint;
use tracing::{error, info, warn};

use crate::{error::AppError, middleware::bearer_auth_middleware, state::AppState};

pub const NO_OFFERS_MESSAGE: &str = "no flight offers found";

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/flights/search", get(search_flights))
        .route_layer(middleware::from_fn_with_state(state, bearer_auth_middleware))
}

async fn search_flights(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<SearchResponse>, AppError> {
    // 1. Validate before touching the cache or any provider
    let search = parse_search_today(&params)?;
    let key = fingerprint(&search);

    // 2. Cache lookup; a failing cache aborts the request
    if let Some(offers) = state.cache.get(&key).await? {
        if let Some(response) = build_search_response(&offers) {
            info!("Cache hit for {}", key);
            return Ok(Json(response));
        }
    }

    // 3. Fan out to every provider
    let result = state.aggregator.fetch_all(&search).await;
    for failure in &result.failures {
        warn!("Provider {} failed for {}: {}", failure.provider, key, failure.error);
    }
    info!(
        "Fan-out for {} returned {} offers from {} providers (timed out: {})",
        key,
        result.offers.len(),
        result.completed,
        result.timed_out
    );

    let response = build_search_response(&result.offers)
        .ok_or_else(|| AppError::NotFound(NO_OFFERS_MESSAGE.to_string()))?;

    // 4. Store the merged offers; a failed write still serves the response
    if let Err(e) = state.cache.set(&key, &result.offers).await {
        error!("Failed to cache offers for {}: {}", key, e);
    }

    Ok(Json(response))
}
