//! Response model of the provider's `GET /flights/{ident}` endpoint.
//!
//! Only the fields reconciliation reads are modelled; everything else in
//! the payload is ignored.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightsResponse {
    #[serde(default)]
    pub flights: Option<Vec<ProviderFlight>>,
}

impl FlightsResponse {
    /// The returned flights; an absent or `null` array reads as empty.
    pub fn flights(&self) -> &[ProviderFlight] {
        self.flights.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderFlight {
    #[serde(default)]
    pub origin: Option<ProviderAirport>,
    #[serde(default)]
    pub destination: Option<ProviderAirport>,
    #[serde(default)]
    pub scheduled_out: Option<String>,
    #[serde(default)]
    pub scheduled_in: Option<String>,
    #[serde(default)]
    pub estimated_in: Option<String>,
    #[serde(default)]
    pub actual_in: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderAirport {
    #[serde(default)]
    pub code_iata: Option<String>,
}

impl ProviderFlight {
    pub fn origin_iata(&self) -> Option<&str> {
        self.origin.as_ref()?.code_iata.as_deref()
    }

    pub fn destination_iata(&self) -> Option<&str> {
        self.destination.as_ref()?.code_iata.as_deref()
    }

    /// The best known arrival time: scheduled, then estimated, then actual.
    pub fn arrival_time(&self) -> Option<&str> {
        [&self.scheduled_in, &self.estimated_in, &self.actual_in]
            .into_iter()
            .filter_map(|t| t.as_deref())
            .find(|t| !t.trim().is_empty())
    }
}
