//! Alert Emitter
//!
//! Mục đích: Phát cảnh báo tới mọi subscriber đã đăng ký.
//!
//! Features:
//! - Named and anonymous subscribers
//! - Channel subscription for async consumers
//! - Enable/disable switch (suppressed alerts are still counted)
//! - Fault isolation: a failing or panicking sink never reaches the caller;
//!   the fault goes to the error listeners instead

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::types::{Alert, PatternKind};
use crate::logic::error::MonitorError;

// ============================================================================
// SINKS
// ============================================================================

/// Anything that wants alerts
pub trait AlertSink: Send + Sync {
    fn on_alert(&self, alert: &Alert) -> Result<(), MonitorError>;
}

impl<F> AlertSink for F
where
    F: Fn(&Alert) + Send + Sync,
{
    fn on_alert(&self, alert: &Alert) -> Result<(), MonitorError> {
        self(alert);
        Ok(())
    }
}

/// Forwards alerts into a tokio channel
pub struct ChannelSink {
    name: String,
    tx: mpsc::UnboundedSender<Alert>,
}

impl AlertSink for ChannelSink {
    fn on_alert(&self, alert: &Alert) -> Result<(), MonitorError> {
        self.tx.send(alert.clone()).map_err(|_| MonitorError::Delivery {
            subscriber: self.name.clone(),
            message: "receiver dropped".to_string(),
        })
    }
}

type ErrorListener = Arc<dyn Fn(&MonitorError) + Send + Sync>;

struct Subscription {
    name: String,
    sink: Arc<dyn AlertSink>,
}

// ============================================================================
// STATS
// ============================================================================

#[derive(Debug, Clone, Default, Serialize)]
pub struct AlertStats {
    pub total_alerts: u64,
    pub by_pattern: HashMap<PatternKind, u64>,
    pub suppressed: u64,
    pub delivery_failures: u64,
    pub last_alert_at: Option<DateTime<Local>>,
}

impl AlertStats {
    pub fn count(&self, pattern: PatternKind) -> u64 {
        self.by_pattern.get(&pattern).copied().unwrap_or(0)
    }
}

// ============================================================================
// EMITTER
// ============================================================================

pub struct AlertEmitter {
    subscribers: RwLock<Vec<Subscription>>,
    error_listeners: RwLock<Vec<ErrorListener>>,
    enabled: AtomicBool,
    stats: Mutex<AlertStats>,
}

impl AlertEmitter {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            error_listeners: RwLock::new(Vec::new()),
            enabled: AtomicBool::new(true),
            stats: Mutex::new(AlertStats::default()),
        }
    }

    /// Register an anonymous sink; returns its generated name
    pub fn subscribe<S: AlertSink + 'static>(&self, sink: S) -> String {
        let name = format!("subscriber-{}", Uuid::new_v4());
        self.subscribe_named(&name, sink);
        name
    }

    /// Register (or replace) a sink under `name`
    pub fn subscribe_named<S: AlertSink + 'static>(&self, name: &str, sink: S) {
        let mut subs = self.subscribers.write();
        subs.retain(|s| s.name != name);
        subs.push(Subscription {
            name: name.to_string(),
            sink: Arc::new(sink),
        });
        log::info!("Registered alert subscriber: {}", name);
    }

    /// Alerts delivered through an unbounded channel
    pub fn subscribe_channel(&self, name: &str) -> mpsc::UnboundedReceiver<Alert> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribe_named(name, ChannelSink { name: name.to_string(), tx });
        rx
    }

    pub fn unsubscribe(&self, name: &str) -> bool {
        let mut subs = self.subscribers.write();
        let before = subs.len();
        subs.retain(|s| s.name != name);
        let removed = subs.len() < before;
        if removed {
            log::info!("Unregistered alert subscriber: {}", name);
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Error channel: faults from sinks, detectors and the sampler
    pub fn on_error<F>(&self, listener: F)
    where
        F: Fn(&MonitorError) + Send + Sync + 'static,
    {
        self.error_listeners.write().push(Arc::new(listener));
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
        log::info!("Alert delivery {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Deliver an alert to every subscriber, in registration order
    pub fn emit(&self, alert: Alert) {
        {
            let mut stats = self.stats.lock();
            stats.total_alerts += 1;
            *stats.by_pattern.entry(alert.pattern).or_insert(0) += 1;
            stats.last_alert_at = Some(alert.raised_at);
            if !self.is_enabled() {
                stats.suppressed += 1;
            }
        }

        log::warn!(
            "Security alert: {} - {} (Threat: {}/10)",
            alert.reason,
            alert.display_details(),
            alert.threat_score
        );

        if !self.is_enabled() {
            return;
        }

        // Sinks run without the subscriber lock so they may (un)subscribe
        let sinks: Vec<(String, Arc<dyn AlertSink>)> = self
            .subscribers
            .read()
            .iter()
            .map(|s| (s.name.clone(), Arc::clone(&s.sink)))
            .collect();

        for (name, sink) in sinks {
            let outcome = catch_unwind(AssertUnwindSafe(|| sink.on_alert(&alert)));
            let fault = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(e),
                Err(payload) => Some(MonitorError::SubscriberPanicked {
                    subscriber: name,
                    message: MonitorError::panic_message(payload.as_ref()),
                }),
            };
            if let Some(err) = fault {
                self.stats.lock().delivery_failures += 1;
                self.report_error(&err);
            }
        }
    }

    /// Log a fault and hand it to the error listeners
    pub fn report_error(&self, err: &MonitorError) {
        log::error!("{}", err);
        let listeners: Vec<ErrorListener> = self.error_listeners.read().iter().cloned().collect();
        for listener in listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(err))).is_err() {
                log::error!("Error listener panicked while handling: {}", err);
            }
        }
    }

    pub fn stats(&self) -> AlertStats {
        self.stats.lock().clone()
    }

    pub fn reset_stats(&self) {
        *self.stats.lock() = AlertStats::default();
        log::info!("Reset alert statistics");
    }
}

impl Default for AlertEmitter {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
