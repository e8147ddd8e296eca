use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self { url: "redis://127.0.0.1:6379".to_string() }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Redis,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            ttl_seconds: default_ttl_seconds(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

fn default_ttl_seconds() -> u64 { 30 }

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    pub username: String,
    pub password: String,
}

fn default_issuer() -> String { "skyfare".to_string() }

/// Upstream provider settings. A provider is enabled when its section is present.
#[derive(Debug, Deserialize, Clone)]
pub struct ProvidersConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_fan_out_deadline_ms")]
    pub fan_out_deadline_ms: u64,
    pub amadeus: Option<AmadeusConfig>,
    pub serpapi: Option<SerpApiConfig>,
    pub priceline: Option<PriceLineConfig>,
    pub mock: Option<MockConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            fan_out_deadline_ms: default_fan_out_deadline_ms(),
            amadeus: None,
            serpapi: None,
            priceline: None,
            mock: None,
        }
    }
}

impl ProvidersConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn fan_out_deadline(&self) -> Duration {
        Duration::from_millis(self.fan_out_deadline_ms)
    }
}

fn default_timeout_ms() -> u64 { 10_000 }
fn default_fan_out_deadline_ms() -> u64 { 15_000 }

#[derive(Debug, Deserialize, Clone)]
pub struct AmadeusConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

fn default_max_results() -> u32 { 10 }

#[derive(Debug, Deserialize, Clone)]
pub struct SerpApiConfig {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PriceLineConfig {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MockConfig {
    #[serde(default)]
    pub should_fail: bool,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Provider secrets, kept apart from the rest of the settings
            .add_source(config::File::with_name("credentials").required(false))
            // e.g. `SKYFARE__AUTH__JWT_SECRET=...`
            .add_source(config::Environment::with_prefix("SKYFARE").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [server]
        port = 3000

        [auth]
        jwt_secret = "secret"
        jwt_expiration_seconds = 3600
        username = "user"
        password = "pass"
    "#;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml(MINIMAL).expect("config should parse");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.cache.backend, CacheBackend::Redis);
        assert_eq!(config.cache.ttl(), Duration::from_secs(30));
        assert_eq!(config.auth.issuer, "skyfare");
        assert_eq!(config.providers.timeout(), Duration::from_secs(10));
        assert_eq!(config.providers.fan_out_deadline(), Duration::from_secs(15));
        assert!(config.providers.amadeus.is_none());
        assert!(config.providers.mock.is_none());
    }

    #[test]
    fn test_provider_sections() {
        let source = format!(
            "{}\n{}",
            MINIMAL,
            r#"
            [cache]
            backend = "memory"
            ttl_seconds = 5

            [providers]
            timeout_ms = 2500

            [providers.amadeus]
            base_url = "https://test.api.amadeus.com"
            api_key = "key"
            api_secret = "secret"

            [providers.mock]
            should_fail = true
            "#
        );

        let config = Config::from_toml(&source).expect("config should parse");
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.cache.ttl(), Duration::from_secs(5));
        assert_eq!(config.providers.timeout(), Duration::from_millis(2500));

        let amadeus = config.providers.amadeus.expect("amadeus enabled");
        assert_eq!(amadeus.max_results, 10);
        assert!(config.providers.mock.expect("mock enabled").should_fail);
        assert!(config.providers.serpapi.is_none());
        assert!(config.providers.priceline.is_none());
    }
}
