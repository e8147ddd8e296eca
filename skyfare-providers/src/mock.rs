use async_trait::async_trait;
use skyfare_core::{FlightOffer, FlightProvider, FlightSearch, ProviderError};

const PROVIDER_NAME: &str = "Mock";

/// Deterministic provider for local runs and tests; never touches the network.
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    should_fail: bool,
}

impl MockProvider {
    pub fn new(should_fail: bool) -> Self {
        Self { should_fail }
    }
}

#[async_trait]
impl FlightProvider for MockProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch(&self, search: &FlightSearch) -> Result<Vec<FlightOffer>, ProviderError> {
        if self.should_fail {
            return Err(ProviderError::Unavailable {
                provider: PROVIDER_NAME.to_string(),
                message: "mock provider error".to_string(),
            });
        }

        let date = search.departure_date_str();
        let offer = |provider: &str, price: f64, duration: &str| FlightOffer {
            provider: provider.to_string(),
            price,
            duration: duration.to_string(),
            origin: search.origin.clone(),
            destination: search.destination.clone(),
            date: date.clone(),
        };

        Ok(vec![
            offer("MockAir", 80.0, "PT16H30M"),
            offer("MockExpress", 150.0, "PT3H0M"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::jfk_lax;

    #[tokio::test]
    async fn test_fixed_offers() {
        let offers = MockProvider::new(false).fetch(&jfk_lax()).await.unwrap();
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].provider, "MockAir");
        assert_eq!(offers[0].price, 80.0);
        assert_eq!(offers[0].duration, "PT16H30M");
        assert_eq!(offers[1].provider, "MockExpress");
        assert_eq!(offers[1].price, 150.0);
        assert_eq!(offers[1].duration, "PT3H0M");
        for offer in &offers {
            assert_eq!(offer.origin, "JFK");
            assert_eq!(offer.destination, "LAX");
            assert_eq!(offer.date, "2030-05-02");
        }
    }

    #[tokio::test]
    async fn test_failure_mode() {
        let err = MockProvider::new(true).fetch(&jfk_lax()).await.unwrap_err();
        assert_eq!(err.to_string(), "Mock: mock provider error");
    }
}
