//! deauth-watch - Demo Entry Point
//!
//! Chạy monitor với nguồn snapshot giả lập, log mọi cảnh báo.
//! Dừng bằng Ctrl-C hoặc sau `DEAUTH_DEMO_SECONDS` giây.

use std::sync::Arc;
use std::time::Duration;

use wifi_deauth_core::constants::{self, APP_NAME, APP_VERSION};
use wifi_deauth_core::logic::analysis_loop;
use wifi_deauth_core::logic::simulate::SimulatedSource;
use wifi_deauth_core::{Alert, DeauthMonitor, DetectorConfig};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{} (demo mode)...", APP_NAME, APP_VERSION);

    let config = DetectorConfig::from_env();
    let monitor = match DeauthMonitor::new(config) {
        Ok(m) => Arc::new(m),
        Err(e) => {
            log::error!("Refusing to start: {}", e);
            std::process::exit(2);
        }
    };

    monitor.emitter().subscribe_named("console", |alert: &Alert| {
        log::warn!(
            "[{}] {} | {} | severity {} | {}",
            alert.timestamp_str(),
            alert.pattern,
            alert.reason,
            alert.severity().as_str(),
            alert.display_details()
        );
    });
    monitor.emitter().on_error(|err| log::error!("Monitor fault: {}", err));

    let seed = constants::get_demo_seed();
    let source = SimulatedSource::new(seed).with_attack_chance(0.02);
    log::info!("Simulated sampler seeded with {}", seed);

    let handle = analysis_loop::start(Arc::clone(&monitor), source);

    let demo_seconds = constants::get_demo_seconds();
    if demo_seconds > 0 {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => log::info!("Interrupted"),
            _ = tokio::time::sleep(Duration::from_secs(demo_seconds)) => {
                log::info!("Demo time of {}s elapsed", demo_seconds)
            }
        }
    } else if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {}", e);
    }

    handle.stop().await;

    let stats = monitor.stats();
    log::info!(
        "Summary: {} snapshots, {} disconnects, {} alerts ({} signal drops flagged)",
        stats.snapshots_seen,
        stats.disconnects_recorded,
        stats.alerts.total_alerts,
        stats.signal_drops_flagged
    );
    match serde_json::to_string_pretty(&stats) {
        Ok(json) => log::debug!("Final stats:\n{}", json),
        Err(e) => log::warn!("Could not serialize stats: {}", e),
    }
}
