//! Deauth Monitor - Public Facade
//!
//! Mục đích: Điểm vào duy nhất cho caller bên ngoài.
//!
//! # Operations
//! - `record_snapshot`: ghi mẫu tín hiệu, phát hiện disconnect, chấm điểm,
//!   cảnh báo ngay nếu điểm cao
//! - `tick`: chạy 4 pattern detector theo thứ tự cố định
//! - `subscribe`: đăng ký nhận cảnh báo
//! - `recent_events`: disconnect gần đây, mới nhất trước
//!
//! Each store has its own lock and no two are held at once. Alerts are
//! emitted only after every store guard has been dropped.

#[cfg(test)]
mod tests;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Local};
use parking_lot::Mutex;
use serde::Serialize;

use crate::logic::alerts::{Alert, AlertEmitter, AlertSink, AlertStats, PatternKind};
use crate::logic::config::DetectorConfig;
use crate::logic::connection::{ConnectionSnapshot, ConnectionTracker, Transition};
use crate::logic::error::MonitorError;
use crate::logic::history::{
    DisconnectEvent, DisconnectHistory, EventSummary, SignalHistory, SignalSample,
};
use crate::logic::patterns::PatternAnalyzer;
use crate::logic::threat::{self, ScoringRules, SIGNAL_DROP_WINDOW_MINUTES};

const SCORER_NAME: &str = "threat_scorer";

/// Counters for the status view
#[derive(Debug, Clone, Serialize)]
pub struct MonitorStats {
    pub snapshots_seen: u64,
    pub disconnects_recorded: u64,
    pub ticks_run: u64,
    pub signal_drops_flagged: u64,
    pub signal_samples: usize,
    pub disconnect_events: usize,
    pub connected: bool,
    pub current_ssid: Option<String>,
    pub alerts: AlertStats,
}

#[derive(Default)]
struct Counters {
    snapshots_seen: AtomicU64,
    disconnects_recorded: AtomicU64,
    ticks_run: AtomicU64,
    signal_drops_flagged: AtomicU64,
}

pub struct DeauthMonitor {
    config: DetectorConfig,
    rules: ScoringRules,
    tracker: Mutex<ConnectionTracker>,
    signals: Mutex<SignalHistory>,
    disconnects: Mutex<DisconnectHistory>,
    analyzer: PatternAnalyzer,
    emitter: AlertEmitter,
    counters: Counters,
}

impl DeauthMonitor {
    pub fn new(config: DetectorConfig) -> Result<Self, MonitorError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    pub fn with_defaults() -> Self {
        Self::build(DetectorConfig::default())
    }

    fn build(config: DetectorConfig) -> Self {
        log::info!(
            "Deauth monitor started (rapid threshold {}, window {}m, dedup {})",
            config.rapid_disconnect_threshold,
            config.suspicious_window_minutes,
            config.rapid_dedup.as_str()
        );

        Self {
            rules: ScoringRules::from_config(&config),
            tracker: Mutex::new(ConnectionTracker::new()),
            signals: Mutex::new(SignalHistory::new(config.signal_memory())),
            disconnects: Mutex::new(DisconnectHistory::new(config.pattern_memory())),
            analyzer: PatternAnalyzer::new(config.clone()),
            emitter: AlertEmitter::new(),
            counters: Counters::default(),
            config,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn emitter(&self) -> &AlertEmitter {
        &self.emitter
    }

    // ------------------------------------------------------------------------
    // INGEST
    // ------------------------------------------------------------------------

    /// Feed one observation. Returns the scored disconnect when this snapshot
    /// closed a connection.
    ///
    /// Never panics outward: a fault while scoring is reported on the
    /// emitter's error channel and the snapshot is dropped.
    pub fn record_snapshot(&self, snapshot: ConnectionSnapshot) -> Option<DisconnectEvent> {
        self.counters.snapshots_seen.fetch_add(1, Ordering::Relaxed);

        let outcome = catch_unwind(AssertUnwindSafe(|| self.ingest(&snapshot)));
        match outcome {
            Ok((event, alert)) => {
                if let Some(alert) = alert {
                    self.emitter.emit(alert);
                }
                event
            }
            Err(payload) => {
                self.emitter.report_error(&MonitorError::DetectorPanicked {
                    detector: SCORER_NAME,
                    message: MonitorError::panic_message(payload.as_ref()),
                });
                None
            }
        }
    }

    fn ingest(&self, snapshot: &ConnectionSnapshot) -> (Option<DisconnectEvent>, Option<Alert>) {
        // Retention holds relative to every snapshot, not only disconnect edges
        self.disconnects.lock().prune(snapshot.captured_at);
        self.signals.lock().prune(snapshot.captured_at);

        let transition = self.tracker.lock().observe(snapshot);

        if let Some(sample) = SignalSample::from_snapshot(snapshot) {
            self.record_signal(sample);
        }

        let (last_connected, connection_duration_secs, at) = match transition {
            Transition::Disconnected {
                last_connected,
                connection_duration_secs,
                at,
            } => (last_connected, connection_duration_secs, at),
            Transition::Connected => {
                log::info!("Connected to {}", snapshot.ssid_or_unknown());
                return (None, None);
            }
            Transition::Unchanged => return (None, None),
        };

        let mut event = DisconnectEvent::new(&last_connected, connection_duration_secs, at);

        let signal_drop = self.signals.lock().had_recent_drop(
            event.ssid.as_deref(),
            Duration::minutes(SIGNAL_DROP_WINDOW_MINUTES),
            at,
            self.config.signal_drop_threshold,
        );

        let assessment = {
            let mut history = self.disconnects.lock();
            history.prune(at);
            let assessment = threat::assess_with_rules(&event, history.all(), signal_drop, &self.rules);
            event.threat_score = assessment.score;
            history.record(event.clone());
            assessment
        };
        self.counters.disconnects_recorded.fetch_add(1, Ordering::Relaxed);

        log::info!(
            "Disconnect from {} (signal {}%, connected {:.0}s, threat {}/10)",
            event.ssid_or_unknown(),
            event.last_signal_percent,
            event.connection_duration_secs,
            event.threat_score
        );
        log::debug!("Threat factors: {}", assessment.explain());

        let alert = threat::immediate_alert_label(&event, &self.config).map(|label| {
            Alert::new(
                PatternKind::ImmediateHighThreat,
                label,
                event.threat_score,
                format!(
                    "Threat score {}/10: {}",
                    event.threat_score,
                    assessment.explain()
                ),
                at,
            )
            .with_network(event.ssid.as_deref())
        });

        (Some(event), alert)
    }

    fn record_signal(&self, sample: SignalSample) {
        let drop = {
            let mut signals = self.signals.lock();
            signals.record(sample);
            signals.sudden_drop(self.config.signal_drop_threshold)
        };

        if let Some(drop) = drop {
            self.counters.signal_drops_flagged.fetch_add(1, Ordering::Relaxed);
            log::warn!(
                "Sudden signal drop on {}: {:.0}% -> {}% (-{:.0})",
                drop.ssid.as_deref().unwrap_or("Unknown"),
                drop.baseline,
                drop.current,
                drop.drop
            );
        }
    }

    // ------------------------------------------------------------------------
    // ANALYSIS
    // ------------------------------------------------------------------------

    /// Run the pattern detectors against the current wall clock
    pub fn tick(&self) -> Vec<Alert> {
        self.tick_at(Local::now())
    }

    /// Run the pattern detectors as of `now`; returns what was emitted
    pub fn tick_at(&self, now: DateTime<Local>) -> Vec<Alert> {
        self.counters.ticks_run.fetch_add(1, Ordering::Relaxed);

        let report = self.analyzer.analyze(&self.disconnects, &self.signals, now);
        if report.pruned_disconnects + report.pruned_signals > 0 {
            log::debug!(
                "Pruned {} disconnects, {} signal samples",
                report.pruned_disconnects,
                report.pruned_signals
            );
        }

        for fault in &report.faults {
            self.emitter.report_error(fault);
        }
        for alert in &report.alerts {
            self.emitter.emit(alert.clone());
        }
        report.alerts
    }

    // ------------------------------------------------------------------------
    // SUBSCRIPTIONS
    // ------------------------------------------------------------------------

    /// Register a sink; returns its subscriber id
    pub fn subscribe<S: AlertSink + 'static>(&self, sink: S) -> String {
        self.emitter.subscribe(sink)
    }

    pub fn unsubscribe(&self, id: &str) -> bool {
        self.emitter.unsubscribe(id)
    }

    // ------------------------------------------------------------------------
    // QUERIES
    // ------------------------------------------------------------------------

    /// Disconnects inside `window`, newest first
    pub fn recent_events(&self, window: Duration) -> Vec<EventSummary> {
        self.recent_events_at(window, Local::now())
    }

    pub fn recent_events_at(&self, window: Duration, now: DateTime<Local>) -> Vec<EventSummary> {
        let events = self.disconnects.lock().within(window, now);
        events.iter().rev().map(DisconnectEvent::summary).collect()
    }

    /// Full records strictly after `cutoff`, oldest first
    pub fn disconnects_since(&self, cutoff: DateTime<Local>) -> Vec<DisconnectEvent> {
        self.disconnects.lock().since(cutoff)
    }

    /// Drop disconnects at or before `cutoff`
    pub fn clear_history_up_to(&self, cutoff: DateTime<Local>) -> usize {
        let removed = self.disconnects.lock().clear_up_to(cutoff);
        log::info!("Cleared {} disconnect events up to {}", removed, cutoff);
        removed
    }

    pub fn signal_samples_for(&self, ssid: &str, window: Duration, now: DateTime<Local>) -> Vec<SignalSample> {
        self.signals.lock().recent_for(ssid, window, now)
    }

    pub fn stats(&self) -> MonitorStats {
        let signal_samples = self.signals.lock().len();
        let disconnect_events = self.disconnects.lock().len();
        let (connected, current_ssid) = {
            let tracker = self.tracker.lock();
            (tracker.is_connected(), tracker.current_ssid().map(str::to_string))
        };

        MonitorStats {
            snapshots_seen: self.counters.snapshots_seen.load(Ordering::Relaxed),
            disconnects_recorded: self.counters.disconnects_recorded.load(Ordering::Relaxed),
            ticks_run: self.counters.ticks_run.load(Ordering::Relaxed),
            signal_drops_flagged: self.counters.signal_drops_flagged.load(Ordering::Relaxed),
            signal_samples,
            disconnect_events,
            connected,
            current_ssid,
            alerts: self.emitter.stats(),
        }
    }

    /// Forget all history and counters. Subscribers stay registered.
    pub fn reset(&self) {
        *self.tracker.lock() = ConnectionTracker::new();
        self.signals.lock().clear();
        self.disconnects.lock().clear();
        self.counters.snapshots_seen.store(0, Ordering::Relaxed);
        self.counters.disconnects_recorded.store(0, Ordering::Relaxed);
        self.counters.ticks_run.store(0, Ordering::Relaxed);
        self.counters.signal_drops_flagged.store(0, Ordering::Relaxed);
        self.emitter.reset_stats();
        log::info!("Monitor state reset");
    }
}

impl Default for DeauthMonitor {
    fn default() -> Self {
        Self::with_defaults()
    }
}
