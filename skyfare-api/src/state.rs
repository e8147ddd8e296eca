use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use skyfare_core::{FlightProvider, OfferStore};
use skyfare_providers::{
    AmadeusClient, FlightAggregator, MockProvider, PriceLineClient, SerpApiClient,
};
use skyfare_store::app_config::{self, CacheBackend, Config, ProvidersConfig};
use skyfare_store::{FlightCache, MemoryStore, RedisClient};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
    pub issuer: String,
    pub username: String,
    pub password: String,
}

impl From<&app_config::AuthConfig> for AuthConfig {
    fn from(config: &app_config::AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiration: config.jwt_expiration_seconds,
            issuer: config.issuer.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub cache: FlightCache,
    pub aggregator: Arc<FlightAggregator>,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(cache: FlightCache, aggregator: FlightAggregator, auth: AuthConfig) -> Self {
        Self {
            cache,
            aggregator: Arc::new(aggregator),
            auth,
        }
    }

    /// Wires the cache backend and every configured provider.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn OfferStore> = match config.cache.backend {
            CacheBackend::Redis => {
                let client = RedisClient::new(&config.redis.url)
                    .await
                    .context("failed to connect to Redis")?;
                tracing::info!("Using Redis cache at {}", config.redis.url);
                Arc::new(client)
            }
            CacheBackend::Memory => {
                tracing::info!("Using in-process cache");
                Arc::new(MemoryStore::new())
            }
        };

        let providers = build_providers(&config.providers)?;
        if providers.is_empty() {
            anyhow::bail!("no flight providers configured");
        }

        let aggregator = FlightAggregator::new(providers, config.providers.fan_out_deadline());
        tracing::info!("Providers enabled: {:?}", aggregator.provider_names());

        Ok(Self::new(
            FlightCache::new(store, config.cache.ttl()),
            aggregator,
            AuthConfig::from(&config.auth),
        ))
    }
}

/// A provider is enabled by the presence of its config section.
pub fn build_providers(config: &ProvidersConfig) -> anyhow::Result<Vec<Arc<dyn FlightProvider>>> {
    let timeout: Duration = config.timeout();
    let mut providers: Vec<Arc<dyn FlightProvider>> = Vec::new();

    if let Some(amadeus) = &config.amadeus {
        let client = AmadeusClient::new(
            amadeus.api_key.clone(),
            amadeus.api_secret.clone(),
            &amadeus.base_url,
            amadeus.max_results,
            timeout,
        )
        .context("failed to build Amadeus client")?;
        providers.push(Arc::new(client));
    }

    if let Some(serpapi) = &config.serpapi {
        let client = SerpApiClient::new(serpapi.api_key.clone(), &serpapi.base_url, timeout)
            .context("failed to build SerpAPI client")?;
        providers.push(Arc::new(client));
    }

    if let Some(priceline) = &config.priceline {
        let client = PriceLineClient::new(priceline.api_key.clone(), &priceline.base_url, timeout)
            .context("failed to build PriceLine client")?;
        providers.push(Arc::new(client));
    }

    if let Some(mock) = &config.mock {
        providers.push(Arc::new(MockProvider::new(mock.should_fail)));
    }

    Ok(providers)
}
