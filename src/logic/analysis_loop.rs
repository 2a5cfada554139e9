//! Analysis Loop - Background Scheduling
//!
//! Hai task tokio chạy song song:
//! - Sampling: gọi `SnapshotSource::sample` mỗi `sample_interval_ms`
//!   (trên blocking thread) rồi đưa vào `record_snapshot`
//! - Analysis: gọi `tick` mỗi `analysis_interval_secs`
//!
//! Sampler failures are reported on the emitter's error channel, followed by
//! a back-off pause. `LoopHandle::stop` lets the current iteration finish.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::logic::config::DetectorConfig;
use crate::logic::connection::SnapshotSource;
use crate::logic::error::MonitorError;
use crate::logic::monitor::DeauthMonitor;

/// Loop periods
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopTiming {
    pub sample_every: Duration,
    pub analyze_every: Duration,
    pub error_backoff: Duration,
}

impl LoopTiming {
    pub fn from_config(config: &DetectorConfig) -> Self {
        Self {
            sample_every: Duration::from_millis(config.sample_interval_ms),
            analyze_every: Duration::from_secs(config.analysis_interval_secs),
            error_backoff: Duration::from_secs(config.error_backoff_secs),
        }
    }
}

/// Running loops; drop without `stop` leaves them running until the runtime ends
pub struct LoopHandle {
    stop_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl LoopHandle {
    /// Signal both loops and wait for them to exit
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        for task in self.tasks {
            if let Err(e) = task.await {
                log::error!("Monitor task ended abnormally: {}", e);
            }
        }
        log::info!("Monitor loops stopped");
    }

    pub fn is_running(&self) -> bool {
        self.tasks.iter().any(|t| !t.is_finished())
    }
}

/// Start sampling and analysis with the monitor's configured periods.
/// Must be called from within a tokio runtime.
pub fn start<S: SnapshotSource>(monitor: Arc<DeauthMonitor>, source: S) -> LoopHandle {
    let timing = LoopTiming::from_config(monitor.config());
    start_with_timing(monitor, source, timing)
}

pub fn start_with_timing<S: SnapshotSource>(
    monitor: Arc<DeauthMonitor>,
    source: S,
    timing: LoopTiming,
) -> LoopHandle {
    let (stop_tx, stop_rx) = watch::channel(false);

    let sampler = tokio::spawn(sampling_loop(
        Arc::clone(&monitor),
        Arc::new(Mutex::new(source)),
        timing,
        stop_rx.clone(),
    ));
    let analyzer = tokio::spawn(analysis_loop(monitor, timing, stop_rx));

    log::info!(
        "Monitor loops started (sample every {:?}, analyze every {:?})",
        timing.sample_every,
        timing.analyze_every
    );

    LoopHandle {
        stop_tx,
        tasks: vec![sampler, analyzer],
    }
}

async fn sampling_loop<S: SnapshotSource>(
    monitor: Arc<DeauthMonitor>,
    source: Arc<Mutex<S>>,
    timing: LoopTiming,
    mut stop: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(timing.sample_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = stop.changed() => break,
            _ = ticker.tick() => {}
        }
        if *stop.borrow() {
            break;
        }

        let src = Arc::clone(&source);
        let sampled = tokio::task::spawn_blocking(move || src.lock().sample()).await;

        let err = match sampled {
            Ok(Ok(snapshot)) => {
                monitor.record_snapshot(snapshot);
                continue;
            }
            Ok(Err(e)) => e,
            Err(join_err) => MonitorError::sampler(format!("sampler task failed: {}", join_err)),
        };

        monitor.emitter().report_error(&err);
        tokio::select! {
            _ = stop.changed() => break,
            _ = tokio::time::sleep(timing.error_backoff) => {}
        }
    }
}

async fn analysis_loop(monitor: Arc<DeauthMonitor>, timing: LoopTiming, mut stop: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(timing.analyze_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick fires immediately; analysis starts one period in
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = stop.changed() => break,
            _ = ticker.tick() => {}
        }
        if *stop.borrow() {
            break;
        }

        let alerts = monitor.tick();
        if !alerts.is_empty() {
            log::info!("Analysis tick raised {} alert(s)", alerts.len());
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
