mod cli;

use crate::cli::{CacheBackendArg, LogFormatArg, CLI};
use anyhow::Context;
use clap::Parser;
use flightcheck_cache::{MemoryScheduleCache, MokaScheduleCache};
use flightcheck_core::{OperatingZone, ScheduleCache};
use flightcheck_gateway::{App, AppState};
use flightcheck_provider::{
    BatchSettings, CachedProvider, ProviderClient, ProviderSettings, ReqwestTransport,
    ScheduleService,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;
    init_tracing(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        cache_backend = %config.cache,
        home_airport = %config.home_airport,
        time_zone = %config.time_zone,
        "starting flightcheck gateway"
    );

    let ttl = Duration::from_secs(config.cache_ttl_secs);
    match config.cache {
        CacheBackendArg::Memory => run_server(&config, MemoryScheduleCache::new(ttl)).await,
        CacheBackendArg::Moka => {
            let cache: MokaScheduleCache = MokaScheduleCache::builder().ttl(ttl).build().into();
            run_server(&config, cache).await
        }
    }
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormatArg::Text => builder.init(),
        LogFormatArg::Json => builder.json().init(),
    }
}

async fn run_server<C: ScheduleCache>(config: &CLI, cache: C) -> anyhow::Result<()> {
    let state = match &config.provider_api_key {
        Some(api_key) => {
            let zone = OperatingZone::named(&config.time_zone)?;
            let settings = ProviderSettings::builder()
                .base_url(config.provider_base_url.clone())
                .api_key(api_key.clone())
                .home_airport(config.home_airport.clone())
                .zone(zone.clone())
                .max_retries(config.max_retries)
                .build();
            let transport =
                ReqwestTransport::new(Duration::from_secs(config.request_timeout_secs))?;
            let client = ProviderClient::new(settings, transport)?;

            let batch = BatchSettings::builder()
                .max_concurrency(config.max_concurrency)
                .call_spacing(Duration::from_millis(config.call_spacing_ms))
                .build();
            let service = ScheduleService::new(CachedProvider::new(client, cache), zone, batch);
            AppState::new(Arc::new(service))
        }
        None => {
            warn!("no provider api key configured, batch lookups will be refused");
            AppState::without_credentials()
        }
    };

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "gateway listening");

    axum::serve(listener, App::router(state)).await?;
    Ok(())
}
