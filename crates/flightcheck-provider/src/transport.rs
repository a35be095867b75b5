use crate::error::{ProviderError, TransportError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::trace;

/// Default timeout for provider requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// An outbound GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    pub url: Url,
    pub headers: Vec<(&'static str, String)>,
}

/// The parts of an HTTP response the client inspects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    pub status: u16,
    /// Canonical reason phrase, e.g. `Too Many Requests`.
    pub status_text: String,
    /// Raw `retry-after` header, if present.
    pub retry_after: Option<String>,
    pub body: String,
}

impl ProviderResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends provider requests. Abstracted so retries can be exercised against
/// scripted responses.
#[async_trait]
pub trait HttpTransport: Send + Sync + 'static {
    async fn get(&self, request: &ProviderRequest) -> Result<ProviderResponse, TransportError>;
}

/// [`HttpTransport`] over a shared reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: &ProviderRequest) -> Result<ProviderResponse, TransportError> {
        let mut headers = HeaderMap::with_capacity(request.headers.len());
        for (name, value) in &request.headers {
            let value = HeaderValue::from_str(value)
                .map_err(|e| TransportError(format!("invalid value for header {name}: {e}")))?;
            headers.insert(HeaderName::from_static(*name), value);
        }

        trace!(url = %request.url, "sending provider request");
        let response = self
            .client
            .get(request.url.clone())
            .headers(headers)
            .send()
            .await
            .map_err(|e| TransportError(format!("provider request failed: {e}")))?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(format!("failed to read provider response: {e}")))?;

        Ok(ProviderResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            retry_after,
            body,
        })
    }
}
