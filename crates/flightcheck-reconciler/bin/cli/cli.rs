use clap::{Parser, ValueEnum};
use jiff::civil::Date;
use std::path::PathBuf;

pub const ENTRIES_ENV: &str = "FLIGHTCHECK_ENTRIES";
pub const GATEWAY_URL_ENV: &str = "FLIGHTCHECK_GATEWAY_URL";
pub const TIME_ZONE_ENV: &str = "FLIGHTCHECK_TIME_ZONE";
pub const TIMEOUT_ENV: &str = "FLIGHTCHECK_LOOKUP_TIMEOUT_SECS";
pub const LOG_FORMAT_ENV: &str = "FLIGHTCHECK_LOG_FORMAT";

pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "flightcheck",
    about = "Compare itinerary pickups against scheduled flight arrivals"
)]
pub struct CLI {
    /// JSON array of itinerary entries.
    #[arg(long, env = ENTRIES_ENV)]
    pub entries: PathBuf,

    /// Service date, YYYY-MM-DD.
    #[arg(long, value_parser = parse_date)]
    pub date: Date,

    #[arg(long, env = GATEWAY_URL_ENV, default_value = DEFAULT_GATEWAY_URL)]
    pub gateway_url: String,

    #[arg(
        long,
        env = TIME_ZONE_ENV,
        default_value = flightcheck_core::OperatingZone::DEFAULT_NAME
    )]
    pub time_zone: String,

    #[arg(long, env = TIMEOUT_ENV, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Adopt the scheduled arrival time for every discrepancy and write the
    /// entries file back.
    #[arg(long)]
    pub apply: bool,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,
}

fn parse_date(value: &str) -> Result<Date, String> {
    flightcheck_core::parse_date(value).map_err(|e| e.to_string())
}
