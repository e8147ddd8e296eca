use crate::search::{FlightOffer, FlightSearch};
use async_trait::async_trait;

/// Failure of a single provider call. Always scoped to the provider that raised it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider}: auth failed: {message}")]
    Auth { provider: String, message: String },

    #[error("{provider}: status {status}: {body}")]
    Status { provider: String, status: u16, body: String },

    #[error("{provider}: call failed: {message}")]
    Transport { provider: String, message: String },

    #[error("{provider}: decode failed: {message}")]
    Decode { provider: String, message: String },

    #[error("{provider}: no flight offers found")]
    NoOffers { provider: String },

    #[error("{provider}: {message}")]
    Unavailable { provider: String, message: String },
}

impl ProviderError {
    pub fn provider(&self) -> &str {
        match self {
            ProviderError::Auth { provider, .. }
            | ProviderError::Status { provider, .. }
            | ProviderError::Transport { provider, .. }
            | ProviderError::Decode { provider, .. }
            | ProviderError::NoOffers { provider }
            | ProviderError::Unavailable { provider, .. } => provider,
        }
    }

    /// The message without the provider prefix, for wrapping in another variant.
    pub fn detail(&self) -> String {
        match self {
            ProviderError::Auth { message, .. } => format!("auth failed: {}", message),
            ProviderError::Status { status, body, .. } => format!("status {}: {}", status, body),
            ProviderError::Transport { message, .. } => format!("call failed: {}", message),
            ProviderError::Decode { message, .. } => format!("decode failed: {}", message),
            ProviderError::NoOffers { .. } => "no flight offers found".to_string(),
            ProviderError::Unavailable { message, .. } => message.clone(),
        }
    }
}

/// An upstream source of flight offers.
///
/// Implementations own their credentials and any session state (tokens).
/// Callers bound a call by dropping the returned future; implementations
/// must not rely on running to completion.
#[async_trait]
pub trait FlightProvider: Send + Sync {
    /// Stable name used in logs and diagnostics.
    fn name(&self) -> &str;

    async fn fetch(&self, search: &FlightSearch) -> Result<Vec<FlightOffer>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_drops_provider_prefix() {
        let err = ProviderError::Status {
            provider: "Amadeus".to_string(),
            status: 401,
            body: "invalid_client".to_string(),
        };
        assert_eq!(err.to_string(), "Amadeus: status 401: invalid_client");
        assert_eq!(err.detail(), "status 401: invalid_client");
        assert_eq!(err.provider(), "Amadeus");
    }
}
