use std::sync::Arc;

use chrono::{DateTime, Duration, Local, TimeZone};
use parking_lot::Mutex;

use super::DeauthMonitor;
use crate::logic::alerts::{Alert, PatternKind};
use crate::logic::config::{DetectorConfig, RapidDedup};
use crate::logic::connection::ConnectionSnapshot;
use crate::logic::error::MonitorError;
use crate::logic::history::DisconnectEvent;

fn base() -> DateTime<Local> {
    Local.with_ymd_and_hms(2025, 6, 10, 14, 0, 0).unwrap()
}

fn secs(s: i64) -> DateTime<Local> {
    base() + Duration::seconds(s)
}

/// Connect at `connect_at`, drop at `disconnect_at`
fn cycle(
    monitor: &DeauthMonitor,
    ssid: &str,
    signal: u8,
    connect_at: DateTime<Local>,
    disconnect_at: DateTime<Local>,
) -> Option<DisconnectEvent> {
    monitor.record_snapshot(ConnectionSnapshot::connected(ssid, signal, connect_at));
    monitor.record_snapshot(ConnectionSnapshot::disconnected(disconnect_at))
}

fn collect_alerts(monitor: &DeauthMonitor) -> Arc<Mutex<Vec<Alert>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&seen);
    monitor.subscribe(move |a: &Alert| s.lock().push(a.clone()));
    seen
}

/// Four 10-second connections to "Office" at 80%, all inside three minutes
fn office_burst(monitor: &DeauthMonitor) -> Vec<DisconnectEvent> {
    (0..4)
        .filter_map(|i| cycle(monitor, "Office", 80, secs(i * 45), secs(i * 45 + 10)))
        .collect()
}

#[test]
fn test_office_burst_scores_high_and_alerts_once() {
    let monitor = DeauthMonitor::with_defaults();
    let seen = collect_alerts(&monitor);

    let events = office_burst(&monitor);
    assert_eq!(events.len(), 4);
    assert!(events[2].threat_score >= 9, "got {}", events[2].threat_score);
    assert_eq!(events[3].threat_score, 10);

    let immediate = seen
        .lock()
        .iter()
        .filter(|a| a.pattern == PatternKind::ImmediateHighThreat)
        .count();
    assert_eq!(immediate, 4);

    let alerts = monitor.tick_at(secs(180));
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].pattern, PatternKind::RapidDisconnect);
    assert_eq!(alerts[0].threat_score, 8);
    assert_eq!(alerts[0].details, "4 disconnects in 5 minutes");

    assert!(monitor.tick_at(secs(195)).is_empty());
    assert_eq!(monitor.stats().alerts.count(PatternKind::RapidDisconnect), 1);
}

#[test]
fn test_long_weak_daytime_disconnect_is_benign() {
    let monitor = DeauthMonitor::with_defaults();
    let seen = collect_alerts(&monitor);

    let event = cycle(&monitor, "Home", 20, base() - Duration::minutes(30), base()).unwrap();
    assert_eq!(event.connection_duration_secs, 1800.0);
    assert_eq!(event.threat_score, 0);
    assert!(seen.lock().is_empty());
}

#[test]
fn test_immediate_alert_details() {
    let monitor = DeauthMonitor::with_defaults();
    let seen = collect_alerts(&monitor);

    cycle(&monitor, "Office", 80, secs(0), secs(10));

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].reason, "High-risk disconnect pattern");
    assert_eq!(seen[0].ssid.as_deref(), Some("Office"));
    assert_eq!(
        seen[0].details,
        "Threat score 10/10: very short connection (10s) +6, strong signal (80%) +4"
    );
}

#[test]
fn test_brief_connection_alert_below_high_risk_bar() {
    let monitor = DeauthMonitor::with_defaults();
    let seen = collect_alerts(&monitor);

    // short +6 only
    let event = cycle(&monitor, "Office", 40, secs(0), secs(20)).unwrap();
    assert_eq!(event.threat_score, 6);

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].reason, "Rapid disconnect after brief connection");
}

#[test]
fn test_cafe_interference() {
    let monitor = DeauthMonitor::with_defaults();
    for i in 0..10 {
        let signal = if i % 2 == 0 { 10 } else { 85 };
        monitor.record_snapshot(ConnectionSnapshot::connected("Cafe", signal, secs(i * 30)));
    }

    let alerts = monitor.tick_at(secs(300));
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].pattern, PatternKind::SignalInterference);
    assert_eq!(alerts[0].threat_score, 6);
    assert_eq!(alerts[0].ssid.as_deref(), Some("Cafe"));
}

#[test]
fn test_regular_disconnects_trigger_temporal_alert() {
    let monitor = DeauthMonitor::with_defaults();
    for k in 0..5 {
        let drop_at = secs(k * 300);
        cycle(&monitor, &format!("Net{}", k), 60, drop_at - Duration::seconds(200), drop_at);
    }

    let alerts = monitor.tick_at(secs(1210));
    let kinds: Vec<_> = alerts.iter().map(|a| a.pattern).collect();
    assert_eq!(kinds, vec![PatternKind::TemporalRegularity]);
    assert_eq!(alerts[0].details, "Regular disconnect pattern every 300s");
}

#[test]
fn test_irregular_disconnects_stay_quiet() {
    let monitor = DeauthMonitor::with_defaults();
    for (k, off) in [0i64, 50, 950, 1070, 1770].into_iter().enumerate() {
        let drop_at = secs(off);
        cycle(&monitor, &format!("Net{}", k), 60, drop_at - Duration::seconds(20), drop_at);
    }

    assert!(monitor.tick_at(secs(1800)).is_empty());
}

#[test]
fn test_one_event_per_disconnect_edge() {
    let monitor = DeauthMonitor::with_defaults();

    monitor.record_snapshot(ConnectionSnapshot::connected("Office", 60, secs(0)));
    assert!(monitor.record_snapshot(ConnectionSnapshot::disconnected(secs(300))).is_some());
    assert!(monitor.record_snapshot(ConnectionSnapshot::disconnected(secs(301))).is_none());
    assert!(monitor.record_snapshot(ConnectionSnapshot::disconnected(secs(302))).is_none());

    let stats = monitor.stats();
    assert_eq!(stats.snapshots_seen, 4);
    assert_eq!(stats.disconnects_recorded, 1);
    assert_eq!(stats.disconnect_events, 1);
    assert!(!stats.connected);
}

#[test]
fn test_stores_respect_retention() {
    let monitor = DeauthMonitor::with_defaults();
    cycle(&monitor, "Office", 60, secs(-600), secs(0));

    let later = base() + Duration::hours(25);
    cycle(&monitor, "Office", 60, later, later + Duration::minutes(10));

    let stats = monitor.stats();
    assert_eq!(stats.disconnect_events, 1);
    assert_eq!(stats.signal_samples, 1);
    assert!(monitor.disconnects_since(base()).iter().all(|e| e.captured_at > base()));
}

#[test]
fn test_connected_snapshot_expires_old_disconnects() {
    let monitor = DeauthMonitor::with_defaults();
    cycle(&monitor, "Office", 60, secs(-600), secs(0));
    assert_eq!(monitor.stats().disconnect_events, 1);

    // reconnect a day later, no new disconnect edge
    let later = base() + Duration::hours(25);
    assert!(monitor
        .record_snapshot(ConnectionSnapshot::connected("Office", 60, later))
        .is_none());

    let stats = monitor.stats();
    assert_eq!(stats.disconnect_events, 0);
    assert_eq!(stats.signal_samples, 1);
}

#[test]
fn test_disconnected_snapshots_expire_old_signal_samples() {
    let monitor = DeauthMonitor::with_defaults();
    monitor.record_snapshot(ConnectionSnapshot::connected("Office", 60, secs(0)));
    monitor.record_snapshot(ConnectionSnapshot::disconnected(base() + Duration::minutes(30)));
    assert_eq!(monitor.stats().signal_samples, 1);

    monitor.record_snapshot(ConnectionSnapshot::disconnected(base() + Duration::hours(2)));

    let stats = monitor.stats();
    assert_eq!(stats.signal_samples, 0);
    assert_eq!(stats.disconnect_events, 1);
}

#[test]
fn test_mark_alerted_keeps_cluster_for_other_detectors() {
    let config = DetectorConfig {
        rapid_dedup: RapidDedup::MarkAlerted,
        ..Default::default()
    };
    let monitor = DeauthMonitor::new(config).unwrap();
    office_burst(&monitor);

    let first: Vec<_> = monitor.tick_at(secs(180)).iter().map(|a| a.pattern).collect();
    assert_eq!(
        first,
        vec![
            PatternKind::RapidDisconnect,
            PatternKind::TemporalRegularity,
            PatternKind::NetworkTargeting,
        ]
    );
    assert_eq!(monitor.stats().disconnect_events, 4);

    let second: Vec<_> = monitor.tick_at(secs(195)).iter().map(|a| a.pattern).collect();
    assert!(!second.contains(&PatternKind::RapidDisconnect));
}

#[test]
fn test_recent_events_newest_first() {
    let monitor = DeauthMonitor::with_defaults();
    office_burst(&monitor);

    let recent = monitor.recent_events_at(Duration::hours(1), secs(180));
    assert_eq!(recent.len(), 4);
    assert_eq!(recent[0].captured_at, secs(145));
    assert_eq!(recent[3].captured_at, secs(10));
    assert_eq!(recent[0].ssid, "Office");
    assert_eq!(recent[0].reason, "Strong signal disconnect (possible deauth)");

    assert_eq!(monitor.recent_events_at(Duration::seconds(90), secs(180)).len(), 2);
}

#[test]
fn test_clear_history_up_to() {
    let monitor = DeauthMonitor::with_defaults();
    office_burst(&monitor);

    assert_eq!(monitor.clear_history_up_to(secs(100)), 3);
    let left = monitor.disconnects_since(secs(-1));
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].captured_at, secs(145));
}

#[test]
fn test_panicking_subscriber_does_not_stop_delivery() {
    let monitor = DeauthMonitor::with_defaults();
    let errors = Arc::new(Mutex::new(Vec::new()));
    let e = Arc::clone(&errors);
    monitor.emitter().on_error(move |err| e.lock().push(err.clone()));

    monitor.subscribe(|_: &Alert| panic!("gui crashed"));
    let seen = collect_alerts(&monitor);

    let event = cycle(&monitor, "Office", 80, secs(0), secs(10));
    assert!(event.is_some());
    assert_eq!(seen.lock().len(), 1);

    let errors = errors.lock();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        MonitorError::SubscriberPanicked { message, .. } if message == "gui crashed"
    ));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = DetectorConfig {
        suspicious_window_minutes: 0,
        ..Default::default()
    };
    assert!(matches!(
        DeauthMonitor::new(config),
        Err(MonitorError::InvalidConfig { .. })
    ));
}

#[test]
fn test_oversized_window_is_rejected_before_build() {
    let config = DetectorConfig {
        pattern_memory_hours: i64::MAX / 2,
        ..Default::default()
    };
    assert!(matches!(
        DeauthMonitor::new(config),
        Err(MonitorError::InvalidConfig { field: "pattern_memory_hours", .. })
    ));

    let config = DetectorConfig {
        suspicious_window_minutes: i64::MAX / 60,
        ..Default::default()
    };
    assert!(matches!(
        DeauthMonitor::new(config),
        Err(MonitorError::InvalidConfig { field: "suspicious_window_minutes", .. })
    ));
}

#[test]
fn test_reset_clears_state_but_keeps_subscribers() {
    let monitor = DeauthMonitor::with_defaults();
    let seen = collect_alerts(&monitor);
    office_burst(&monitor);
    monitor.reset();

    let stats = monitor.stats();
    assert_eq!(stats.disconnect_events, 0);
    assert_eq!(stats.signal_samples, 0);
    assert_eq!(stats.snapshots_seen, 0);
    assert_eq!(stats.alerts.total_alerts, 0);

    seen.lock().clear();
    cycle(&monitor, "Office", 80, secs(600), secs(610));
    assert_eq!(seen.lock().len(), 1);
}
