mod cli;

use crate::cli::{LogFormatArg, CLI};
use anyhow::Context;
use clap::Parser;
use flightcheck_core::{group_by_tab, ComparisonRecord, ComparisonStatus, OperatingZone};
use flightcheck_reconciler::{GatewayClient, JsonFileStore, ReconcileSettings, Reconciler};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;
    init_tracing(config.log_format);

    let zone = OperatingZone::named(&config.time_zone)?;
    let timeout = Duration::from_secs(config.timeout_secs);
    let store = JsonFileStore::load(&config.entries)
        .await
        .with_context(|| format!("failed to load {}", config.entries.display()))?;
    let source = GatewayClient::new(&config.gateway_url, timeout)?;
    let settings = ReconcileSettings::builder()
        .zone(zone)
        .lookup_timeout(timeout)
        .build();
    let reconciler = Reconciler::new(source, settings);

    info!(
        gateway_url = %config.gateway_url,
        date = %config.date,
        "reconciling itinerary"
    );
    let entries = store.entries().await;
    let mut records = reconciler.reconcile(&entries, config.date).await;

    if config.apply {
        for record in records.iter_mut() {
            if record.status != ComparisonStatus::Discrepancy {
                continue;
            }
            let outcome = reconciler.apply_detected_time(record, &store).await;
            match outcome {
                Ok(resolved) => *record = resolved,
                Err(e) => warn!(
                    entry_id = ?record.entry_id(),
                    error = %e,
                    "could not apply detected time"
                ),
            }
        }
    }

    let tabs = group_by_tab(&records);
    print_tab("No discrepancy", &tabs.no_discrepancy);
    print_tab("Discrepancy", &tabs.discrepancy);
    print_tab("Not found / error", &tabs.unresolved);

    Ok(())
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormatArg::Text => builder.init(),
        LogFormatArg::Json => builder.json().init(),
    }
}

fn print_tab(title: &str, records: &[ComparisonRecord]) {
    println!("{title} ({})", records.len());
    for record in records {
        let scheduled = record
            .flight
            .as_ref()
            .and_then(|f| f.scheduled_in.as_deref())
            .unwrap_or("-");
        match &record.service {
            Some(service) => println!(
                "  {:<12} {:<10} pickup {:<22} arrival {:<10} {}",
                service.entry_id.as_str(),
                service.flight_code,
                service.pickup_time,
                scheduled,
                record.message
            ),
            None => println!("  {}", record.message),
        }
    }
    println!();
}
