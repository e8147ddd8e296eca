use crate::duration::parse_iso_duration;
use crate::search::{FlightOffer, SearchResponse};
use std::collections::HashMap;

/// Pick the cheapest and fastest offers and bucket every offer by provider.
///
/// Single pass. Ties keep the first offer seen; bucket order follows input
/// order. Returns `None` for an empty slice, which callers report as
/// "no flight offers found" before reaching here.
pub fn build_search_response(offers: &[FlightOffer]) -> Option<SearchResponse> {
    let first = offers.first()?;

    let mut cheapest = first;
    let mut fastest = first;
    let mut min_duration = parse_iso_duration(&first.duration);
    let mut providers: HashMap<String, Vec<FlightOffer>> = HashMap::new();

    for offer in offers {
        if offer.price < cheapest.price {
            cheapest = offer;
        }

        let duration = parse_iso_duration(&offer.duration);
        if duration < min_duration {
            fastest = offer;
            min_duration = duration;
        }

        providers
            .entry(offer.provider.clone())
            .or_default()
            .push(offer.clone());
    }

    Some(SearchResponse {
        cheapest: cheapest.clone(),
        fastest: fastest.clone(),
        providers,
    })
}
