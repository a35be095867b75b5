use crate::aeroapi::{FlightsResponse, ProviderFlight};
use crate::error::ProviderError;
use crate::provider::FlightProvider;
use crate::transport::{HttpTransport, ProviderRequest, ProviderResponse};
use async_trait::async_trait;
use flightcheck_core::{
    format_twelve_hour, Clock, FlightQuery, FlightResult, OperatingZone, SystemClock,
};
use jiff::Timestamp;
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, warn};
use typed_builder::TypedBuilder;

pub const DEFAULT_BASE_URL: &str = "https://aeroapi.flightaware.com/aeroapi";
pub const DEFAULT_HOME_AIRPORT: &str = "CUN";
pub const API_KEY_HEADER: &str = "x-apikey";

/// Retries after a 429 before giving up (two attempts in total).
pub const DEFAULT_MAX_RETRIES: u32 = 1;
/// Backoff unit when the provider sends no `retry-after`; attempt `n`
/// (zero based) waits `(n + 1) * step`.
pub const DEFAULT_BACKOFF_STEP: Duration = Duration::from_millis(1200);

const TOO_MANY_REQUESTS: u16 = 429;

/// Configures a [`ProviderClient`].
#[derive(Clone, TypedBuilder)]
pub struct ProviderSettings {
    #[builder(default = DEFAULT_BASE_URL.to_string(), setter(into))]
    pub base_url: String,
    #[builder(setter(into))]
    pub api_key: String,
    /// IATA code of the airport the operator picks passengers up at.
    #[builder(default = DEFAULT_HOME_AIRPORT.to_string(), setter(into))]
    pub home_airport: String,
    pub zone: OperatingZone,
    #[builder(default = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,
    #[builder(default = DEFAULT_BACKOFF_STEP)]
    pub backoff_step: Duration,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("home_airport", &self.home_airport)
            .field("zone", &self.zone)
            .field("max_retries", &self.max_retries)
            .field("backoff_step", &self.backoff_step)
            .finish()
    }
}

/// Client for the flight schedule provider.
///
/// One [`fetch`](FlightProvider::fetch) issues one GET, plus at most
/// `max_retries` sequential retries while the provider answers 429.
pub struct ProviderClient<T, C = SystemClock> {
    transport: T,
    clock: C,
    base_url: Url,
    settings: ProviderSettings,
}

impl<T: HttpTransport> ProviderClient<T, SystemClock> {
    pub fn new(settings: ProviderSettings, transport: T) -> Result<Self, ProviderError> {
        Self::with_clock(settings, transport, SystemClock)
    }
}

impl<T: HttpTransport, C: Clock> ProviderClient<T, C> {
    pub fn with_clock(
        settings: ProviderSettings,
        transport: T,
        clock: C,
    ) -> Result<Self, ProviderError> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| ProviderError::InvalidBaseUrl {
            url: settings.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::InvalidBaseUrl {
                url: settings.base_url.clone(),
                reason: "not a hierarchical url".to_string(),
            });
        }

        Ok(Self {
            transport,
            clock,
            base_url,
            settings,
        })
    }

    /// `GET {base}/flights/{code}?start=..&end=..`
    fn request_for(&self, query: &FlightQuery) -> ProviderRequest {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("flights")
                .push(query.code.as_str());
        }
        if let Some((start, end)) = query.window {
            url.query_pairs_mut()
                .append_pair("start", &start.to_string())
                .append_pair("end", &end.to_string());
        }

        ProviderRequest {
            url,
            headers: vec![
                ("accept", "application/json".to_string()),
                (API_KEY_HEADER, self.settings.api_key.clone()),
            ],
        }
    }

    /// Sends the request, sleeping and retrying while rate limited and
    /// budget remains. The last response is returned as is, 429 included.
    async fn send_with_retry(
        &self,
        query: &FlightQuery,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, String> {
        let mut attempt = 0;
        loop {
            let response = self
                .transport
                .get(request)
                .await
                .map_err(|e| e.to_string())?;

            if response.status != TOO_MANY_REQUESTS || attempt >= self.settings.max_retries {
                return Ok(response);
            }

            let delay = retry_delay(
                response.retry_after.as_deref(),
                attempt,
                self.settings.backoff_step,
            );
            warn!(
                code = %query.code,
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                "provider rate limited the request, backing off"
            );
            self.clock.sleep(delay).await;
            attempt += 1;
        }
    }

    fn interpret(&self, query: &FlightQuery, body: &str) -> FlightResult {
        let code = query.code.as_str();
        let response: FlightsResponse = match serde_json::from_str(body) {
            Ok(response) => response,
            Err(e) => {
                warn!(code = %code, error = %e, "provider returned an unreadable body");
                return FlightResult::error_result(code, format!("invalid provider response: {e}"));
            }
        };

        let flights = response.flights();
        if flights.is_empty() {
            debug!(code = %code, "provider has no flights for code");
            return FlightResult::no_data(code);
        }

        let home = self.settings.home_airport.as_str();
        let Some(flight) = flights
            .iter()
            .find(|f| f.destination_iata().is_some_and(|d| d.eq_ignore_ascii_case(home)))
        else {
            debug!(code = %code, home = %home, "no flight lands at the home airport");
            return FlightResult::no_home_flight(code, home);
        };

        self.to_result(code, flight)
    }

    fn to_result(&self, code: &str, flight: &ProviderFlight) -> FlightResult {
        FlightResult {
            departure_airport: flight.origin_iata().map(str::to_string),
            arrival_airport: flight.destination_iata().map(str::to_string),
            scheduled_out: flight
                .scheduled_out
                .as_deref()
                .map(|t| self.local_twelve_hour(t)),
            scheduled_in: flight.arrival_time().map(|t| self.local_twelve_hour(t)),
            status: flight.status.clone(),
            ..FlightResult::empty(code)
        }
    }

    /// Renders a provider timestamp as `h:mm AM` on the operating zone's
    /// wall clock. Values that are not timestamps are passed through.
    fn local_twelve_hour(&self, raw: &str) -> String {
        match raw.trim().parse::<Timestamp>() {
            Ok(instant) => format_twelve_hour(self.settings.zone.wall_clock(instant).time()),
            Err(_) => raw.to_string(),
        }
    }
}

#[async_trait]
impl<T: HttpTransport, C: Clock> FlightProvider for ProviderClient<T, C> {
    async fn fetch(&self, query: &FlightQuery) -> FlightResult {
        let code = query.code.as_str();
        let request = self.request_for(query);

        let response = match self.send_with_retry(query, &request).await {
            Ok(response) => response,
            Err(error) => {
                warn!(code = %code, error = %error, "provider request failed");
                return FlightResult::error_result(code, error);
            }
        };

        if !response.is_success() {
            warn!(code = %code, status = response.status, "provider answered with an error status");
            return FlightResult::error_result(
                code,
                format!("HTTP {}: {}", response.status, response.status_text),
            );
        }

        self.interpret(query, &response.body)
    }
}

/// Delay before retry number `attempt + 1`: the provider's `retry-after`
/// seconds when readable, else `(attempt + 1) * step`.
fn retry_delay(retry_after: Option<&str>, attempt: u32, step: Duration) -> Duration {
    retry_after
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or_else(|| step.saturating_mul(attempt + 1))
}
