use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "FLIGHTCHECK_GATEWAY_LISTEN_ADDR";
pub const PROVIDER_API_KEY_ENV: &str = "FLIGHTCHECK_PROVIDER_API_KEY";
pub const PROVIDER_BASE_URL_ENV: &str = "FLIGHTCHECK_PROVIDER_BASE_URL";
pub const HOME_AIRPORT_ENV: &str = "FLIGHTCHECK_HOME_AIRPORT";
pub const TIME_ZONE_ENV: &str = "FLIGHTCHECK_TIME_ZONE";
pub const CACHE_BACKEND_ENV: &str = "FLIGHTCHECK_CACHE_BACKEND";
pub const CACHE_TTL_ENV: &str = "FLIGHTCHECK_CACHE_TTL_SECS";
pub const MAX_RETRIES_ENV: &str = "FLIGHTCHECK_PROVIDER_MAX_RETRIES";
pub const REQUEST_TIMEOUT_ENV: &str = "FLIGHTCHECK_PROVIDER_TIMEOUT_SECS";
pub const MAX_CONCURRENCY_ENV: &str = "FLIGHTCHECK_MAX_CONCURRENCY";
pub const CALL_SPACING_ENV: &str = "FLIGHTCHECK_CALL_SPACING_MS";
pub const LOG_FORMAT_ENV: &str = "FLIGHTCHECK_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheBackendArg {
    #[value(name = "memory")]
    Memory,
    #[value(name = "moka")]
    Moka,
}

impl Display for CacheBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackendArg::Memory => write!(f, "memory"),
            CacheBackendArg::Moka => write!(f, "moka"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "flightcheck-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Without a key the server still starts, but batch lookups answer 500.
    #[arg(long, env = PROVIDER_API_KEY_ENV, hide_env_values = true)]
    pub provider_api_key: Option<String>,

    #[arg(
        long,
        env = PROVIDER_BASE_URL_ENV,
        default_value = flightcheck_provider::client::DEFAULT_BASE_URL
    )]
    pub provider_base_url: String,

    #[arg(
        long,
        env = HOME_AIRPORT_ENV,
        default_value = flightcheck_provider::client::DEFAULT_HOME_AIRPORT
    )]
    pub home_airport: String,

    #[arg(
        long,
        env = TIME_ZONE_ENV,
        default_value = flightcheck_core::OperatingZone::DEFAULT_NAME
    )]
    pub time_zone: String,

    #[arg(
        long,
        env = CACHE_BACKEND_ENV,
        value_enum,
        default_value_t = CacheBackendArg::Memory
    )]
    pub cache: CacheBackendArg,

    #[arg(long, env = CACHE_TTL_ENV, default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl_secs: u64,

    #[arg(
        long,
        env = MAX_RETRIES_ENV,
        default_value_t = flightcheck_provider::client::DEFAULT_MAX_RETRIES
    )]
    pub max_retries: u32,

    #[arg(long, env = REQUEST_TIMEOUT_ENV, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    #[arg(long, env = MAX_CONCURRENCY_ENV, default_value_t = 1)]
    pub max_concurrency: usize,

    #[arg(long, env = CALL_SPACING_ENV, default_value_t = 0)]
    pub call_spacing_ms: u64,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,
}
