//! Pattern Analysis Module - Cross-event Detection
//!
//! Mục đích: Chạy định kỳ (mặc định 15s) trên hai history store để tìm
//! các pattern mà một disconnect đơn lẻ không thể hiện.
//!
//! # Components
//! - `rapid.rs`: nhiều disconnect trong cửa sổ ngắn
//! - `temporal.rs`: disconnect theo chu kỳ đều (script tự động)
//! - `targeting.rs`: một SSID bị nhắm nhiều lần
//! - `interference.rs`: tín hiệu dao động mạnh, trung bình yếu
//!
//! The analyzer keeps no state between ticks; everything lives in the stores.

pub mod rapid;
pub mod temporal;
pub mod targeting;
pub mod interference;

use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::{DateTime, Local};
use parking_lot::Mutex;

use crate::logic::alerts::Alert;
use crate::logic::config::DetectorConfig;
use crate::logic::error::MonitorError;
use crate::logic::history::{DisconnectHistory, SignalHistory};

pub use temporal::{interval_stats, IntervalStats};
pub use targeting::count_by_ssid;
pub use interference::mean_and_variance;

/// Output of one analysis pass
#[derive(Debug, Default)]
pub struct AnalysisReport {
    /// In emission order: rapid, temporal, targeting, interference
    pub alerts: Vec<Alert>,
    /// Detectors that panicked this pass
    pub faults: Vec<MonitorError>,
    pub pruned_disconnects: usize,
    pub pruned_signals: usize,
}

pub struct PatternAnalyzer {
    config: DetectorConfig,
}

impl PatternAnalyzer {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run all four detectors once against the stores.
    ///
    /// Each detector takes the store lock only long enough to read (or, for
    /// rapid-disconnect, dedup) its window.
    pub fn analyze(
        &self,
        disconnects: &Mutex<DisconnectHistory>,
        signals: &Mutex<SignalHistory>,
        now: DateTime<Local>,
    ) -> AnalysisReport {
        let mut report = AnalysisReport {
            pruned_disconnects: disconnects.lock().prune(now),
            pruned_signals: signals.lock().prune(now),
            ..Default::default()
        };
        let config = &self.config;

        // 1. Rapid disconnects (may clear the cluster it alerted on)
        self.run_guarded(&mut report, rapid::NAME, || {
            let mut history = disconnects.lock();
            rapid::detect(&mut history, config, now).into_iter().collect()
        });

        // 2. Temporal regularity
        self.run_guarded(&mut report, temporal::NAME, || {
            let events = disconnects.lock().since(now - config.temporal_window());
            temporal::detect(&events, config, now).into_iter().collect()
        });

        // 3. Network targeting
        self.run_guarded(&mut report, targeting::NAME, || {
            let events = disconnects.lock().since(now - config.targeting_window());
            targeting::detect(&events, config, now)
        });

        // 4. Signal interference
        self.run_guarded(&mut report, interference::NAME, || {
            let samples = signals.lock().since(now - config.interference_window());
            interference::detect(&samples, config, now)
        });

        report
    }

    fn run_guarded<F>(&self, report: &mut AnalysisReport, detector: &'static str, run: F)
    where
        F: FnOnce() -> Vec<Alert>,
    {
        match catch_unwind(AssertUnwindSafe(run)) {
            Ok(alerts) => report.alerts.extend(alerts),
            Err(payload) => report.faults.push(MonitorError::DetectorPanicked {
                detector,
                message: MonitorError::panic_message(payload.as_ref()),
            }),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
