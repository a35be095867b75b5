use crate::error::ReconcileError;
use async_trait::async_trait;
use flightcheck_core::{CanonicalFlightCode, FlightResult, ScheduleSource, SourceError};
use jiff::civil::Date;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const BATCH_PATH: &str = "v1/flights/batch";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchBody<'a> {
    flight_codes: &'a [CanonicalFlightCode],
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<Date>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`ScheduleSource`] that resolves batches through a remote gateway, so
/// provider credentials stay on the server.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    endpoint: Url,
}

impl GatewayClient {
    /// `base_url` is the gateway root, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ReconcileError> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, client)
    }

    pub fn with_client(base_url: &str, client: Client) -> Result<Self, ReconcileError> {
        let invalid = |reason: String| ReconcileError::InvalidGatewayUrl {
            url: base_url.to_string(),
            reason,
        };
        let mut base = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let endpoint = base.join(BATCH_PATH).map_err(|e| invalid(e.to_string()))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ScheduleSource for GatewayClient {
    async fn lookup(
        &self,
        codes: &[CanonicalFlightCode],
        date: Option<Date>,
    ) -> Result<Vec<FlightResult>, SourceError> {
        debug!(endpoint = %self.endpoint, codes = codes.len(), "requesting flight batch");
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&BatchBody {
                flight_codes: codes,
                date,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout
                } else {
                    SourceError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status.canonical_reason().unwrap_or_default().to_string(),
            };
            warn!(status = status.as_u16(), error = %message, "gateway refused the batch");
            return Err(match status {
                StatusCode::GATEWAY_TIMEOUT => SourceError::Timeout,
                StatusCode::INTERNAL_SERVER_ERROR
                    if message == SourceError::MissingCredentials.to_string() =>
                {
                    SourceError::MissingCredentials
                }
                _ => SourceError::Rejected(format!("HTTP {}: {message}", status.as_u16())),
            });
        }

        let results: Vec<FlightResult> = response
            .json()
            .await
            .map_err(|e| SourceError::InvalidResponse(e.to_string()))?;
        if results.len() != codes.len() {
            return Err(SourceError::InvalidResponse(format!(
                "expected {} results, got {}",
                codes.len(),
                results.len()
            )));
        }
        Ok(results)
    }
}
