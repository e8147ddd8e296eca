use serde::de::DeserializeOwned;
use skyfare_core::ProviderError;
use std::time::Duration;

pub(crate) fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(timeout).build()
}

pub(crate) fn trim_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

pub(crate) fn transport_error(provider: &str, err: reqwest::Error) -> ProviderError {
    ProviderError::Transport {
        provider: provider.to_string(),
        message: err.to_string(),
    }
}

/// Read the body, reject non-2xx statuses, then decode JSON.
pub(crate) async fn decode_json<T: DeserializeOwned>(
    provider: &str,
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(provider, e))?;

    if !status.is_success() {
        return Err(ProviderError::Status {
            provider: provider.to_string(),
            status: status.as_u16(),
            body: body.trim().to_string(),
        });
    }

    serde_json::from_str(&body).map_err(|e| ProviderError::Decode {
        provider: provider.to_string(),
        message: e.to_string(),
    })
}
