//! Threat Scorer
//!
//! CHỈ chứa logic chấm điểm - không có types, không có policy.
//! Input: DisconnectEvent, recent disconnects, recent signal drop flag
//! Output: ThreatAssessment (0-10)
//!
//! Deterministic and side-effect free: the event's own timestamp is "now".

use chrono::{Duration, Timelike};

use super::rules::*;
use super::types::{FactorKind, ScoreFactor, ThreatAssessment};
use crate::logic::config::DetectorConfig;
use crate::logic::history::DisconnectEvent;

// ============================================================================
// MAIN SCORING FUNCTIONS
// ============================================================================

/// Threat score for `event`, 0-10.
///
/// `recent` may be the whole disconnect history; only events inside the
/// frequency window ending at `event.captured_at` are counted. It must not
/// contain `event` itself.
pub fn score(event: &DisconnectEvent, recent: &[DisconnectEvent], recent_signal_drop: bool) -> u8 {
    assess(event, recent, recent_signal_drop).score
}

/// Score with the per-factor breakdown
pub fn assess(
    event: &DisconnectEvent,
    recent: &[DisconnectEvent],
    recent_signal_drop: bool,
) -> ThreatAssessment {
    assess_with_rules(event, recent, recent_signal_drop, &ScoringRules::default())
}

/// Scoring with custom windows
pub fn assess_with_rules(
    event: &DisconnectEvent,
    recent: &[DisconnectEvent],
    recent_signal_drop: bool,
    rules: &ScoringRules,
) -> ThreatAssessment {
    let mut factors = Vec::new();

    // Factor 1: very short connections are suspicious
    let duration = event.connection_duration_secs;
    if duration < rules.short_connection_secs {
        factors.push(factor(
            FactorKind::ConnectionDuration,
            SHORT_CONNECTION_POINTS,
            format!("very short connection ({:.0}s)", duration),
        ));
    } else if duration < rules.brief_connection_secs {
        factors.push(factor(
            FactorKind::ConnectionDuration,
            BRIEF_CONNECTION_POINTS,
            format!("brief connection ({:.0}s)", duration),
        ));
    }

    // Factor 2: strong signal at disconnect
    let signal = event.last_signal_percent;
    if signal > STRONG_SIGNAL_PERCENT {
        factors.push(factor(
            FactorKind::SignalStrength,
            STRONG_SIGNAL_POINTS,
            format!("strong signal ({}%)", signal),
        ));
    } else if signal > MODERATE_SIGNAL_PERCENT {
        factors.push(factor(
            FactorKind::SignalStrength,
            MODERATE_SIGNAL_POINTS,
            format!("moderate signal ({}%)", signal),
        ));
    }

    // Factor 3: disconnect frequency
    let window_start = event.captured_at - Duration::minutes(rules.frequency_window_minutes);
    let in_window: Vec<&DisconnectEvent> = recent
        .iter()
        .filter(|d| d.captured_at > window_start && d.captured_at <= event.captured_at)
        .collect();

    if in_window.len() >= BURST_DISCONNECTS {
        factors.push(factor(
            FactorKind::DisconnectFrequency,
            BURST_POINTS,
            format!("{} disconnects in {}m", in_window.len(), rules.frequency_window_minutes),
        ));
    } else if in_window.len() >= REPEAT_DISCONNECTS {
        factors.push(factor(
            FactorKind::DisconnectFrequency,
            REPEAT_POINTS,
            format!("{} disconnects in {}m", in_window.len(), rules.frequency_window_minutes),
        ));
    }

    // Factor 4: off-hours
    let hour = event.captured_at.hour();
    if hour < OFF_HOURS_BEFORE || hour > OFF_HOURS_AFTER {
        factors.push(factor(
            FactorKind::OffHours,
            OFF_HOURS_POINTS,
            format!("off-hours ({:02}:00)", hour),
        ));
    }

    // Factor 5: signal swing right before the drop
    if recent_signal_drop {
        factors.push(factor(
            FactorKind::SignalDrop,
            SIGNAL_DROP_POINTS,
            "signal drop before disconnect".to_string(),
        ));
    }

    // Factor 6: same network hit repeatedly
    if let Some(ssid) = event.ssid.as_deref() {
        let same_network = in_window
            .iter()
            .filter(|d| d.ssid.as_deref() == Some(ssid))
            .count();
        if same_network >= SAME_SSID_DISCONNECTS {
            factors.push(factor(
                FactorKind::RepeatedTarget,
                SAME_SSID_POINTS,
                format!("'{}' dropped {} times", ssid, same_network),
            ));
        }
    }

    let raw_points: u32 = factors.iter().map(|f| f.points as u32).sum();

    ThreatAssessment {
        score: raw_points.min(MAX_SCORE as u32) as u8,
        raw_points,
        factors,
    }
}

fn factor(kind: FactorKind, points: u8, reason: String) -> ScoreFactor {
    ScoreFactor { kind, points, reason }
}

// ============================================================================
// IMMEDIATE ALERT RULE
// ============================================================================

/// Label for an immediate alert on a freshly scored event, if one is due
pub fn immediate_alert_label(event: &DisconnectEvent, config: &DetectorConfig) -> Option<&'static str> {
    if event.threat_score >= config.immediate_alert_threshold {
        Some("High-risk disconnect pattern")
    } else if event.connection_duration_secs < config.minimum_connection_secs
        && event.threat_score >= config.brief_connection_alert_threshold
    {
        Some("Rapid disconnect after brief connection")
    } else {
        None
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::connection::ConnectionSnapshot;
    use chrono::{DateTime, Local, TimeZone};

    fn at(hour: u32, min: u32, sec: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 10, hour, min, sec).unwrap()
    }

    fn event(ssid: Option<&str>, signal: u8, duration: f64, when: DateTime<Local>) -> DisconnectEvent {
        let snap = ConnectionSnapshot::connected(ssid.unwrap_or(""), signal, when);
        DisconnectEvent::new(&snap, duration, when)
    }

    #[test]
    fn test_quiet_disconnect_scores_zero() {
        let e = event(Some("Home"), 20, 1800.0, at(14, 0, 0));
        let result = assess(&e, &[], false);
        assert_eq!(result.score, 0);
        assert!(result.factors.is_empty());
        assert_eq!(result.explain(), "no risk factors");
    }

    #[test]
    fn test_duration_factor_tiers() {
        let short = event(Some("Home"), 20, 10.0, at(14, 0, 0));
        let brief = event(Some("Home"), 20, 60.0, at(14, 0, 0));
        let long = event(Some("Home"), 20, 120.0, at(14, 0, 0));
        assert_eq!(score(&short, &[], false), 6);
        assert_eq!(score(&brief, &[], false), 3);
        assert_eq!(score(&long, &[], false), 0);
    }

    #[test]
    fn test_signal_factor_tiers() {
        assert_eq!(score(&event(Some("Home"), 71, 600.0, at(14, 0, 0)), &[], false), 4);
        assert_eq!(score(&event(Some("Home"), 70, 600.0, at(14, 0, 0)), &[], false), 2);
        assert_eq!(score(&event(Some("Home"), 50, 600.0, at(14, 0, 0)), &[], false), 0);
    }

    #[test]
    fn test_off_hours_boundaries() {
        assert_eq!(score(&event(None, 0, 600.0, at(5, 59, 0)), &[], false), 2);
        assert_eq!(score(&event(None, 0, 600.0, at(6, 0, 0)), &[], false), 0);
        assert_eq!(score(&event(None, 0, 600.0, at(22, 30, 0)), &[], false), 0);
        assert_eq!(score(&event(None, 0, 600.0, at(23, 0, 0)), &[], false), 2);
    }

    #[test]
    fn test_frequency_and_same_network() {
        let now = at(14, 10, 0);
        let history = vec![
            event(Some("Office"), 40, 600.0, at(14, 4, 0)), // outside 5m window
            event(Some("Office"), 40, 600.0, at(14, 6, 0)),
            event(Some("Office"), 40, 600.0, at(14, 8, 0)),
        ];
        let e = event(Some("Office"), 40, 600.0, now);
        let result = assess(&e, &history, false);
        // two in window: +5 frequency, +5 same network
        assert_eq!(result.raw_points, 10);
        assert!(result.has_factor(FactorKind::DisconnectFrequency));
        assert!(result.has_factor(FactorKind::RepeatedTarget));

        let other = event(Some("Cafe"), 40, 600.0, now);
        let result = assess(&other, &history, false);
        assert_eq!(result.raw_points, 5);
        assert!(!result.has_factor(FactorKind::RepeatedTarget));
    }

    #[test]
    fn test_missing_ssid_skips_network_factor() {
        let now = at(14, 10, 0);
        let history = vec![
            event(None, 40, 600.0, at(14, 7, 0)),
            event(None, 40, 600.0, at(14, 8, 0)),
            event(None, 40, 600.0, at(14, 9, 0)),
        ];
        let result = assess(&event(None, 40, 600.0, now), &history, false);
        assert_eq!(result.raw_points, 8);
        assert!(!result.has_factor(FactorKind::RepeatedTarget));
    }

    #[test]
    fn test_score_clamped_to_ten() {
        let now = at(23, 30, 0);
        let history: Vec<_> = (1..=3)
            .map(|i| event(Some("Office"), 90, 5.0, now - Duration::seconds(i * 30)))
            .collect();
        let result = assess(&event(Some("Office"), 90, 5.0, now), &history, true);
        assert_eq!(result.raw_points, 6 + 4 + 8 + 2 + 6 + 5);
        assert_eq!(result.score, 10);
    }

    #[test]
    fn test_score_is_deterministic() {
        let now = at(14, 0, 0);
        let history = vec![event(Some("Office"), 80, 10.0, now - Duration::seconds(40))];
        let e = event(Some("Office"), 80, 10.0, now);
        let first = assess(&e, &history, true);
        for _ in 0..10 {
            assert_eq!(assess(&e, &history, true), first);
        }
    }

    #[test]
    fn test_immediate_alert_rule() {
        let config = DetectorConfig::default();
        let mut e = event(Some("Office"), 80, 10.0, at(14, 0, 0));

        e.threat_score = 7;
        assert_eq!(immediate_alert_label(&e, &config), Some("High-risk disconnect pattern"));

        e.threat_score = 5;
        assert_eq!(
            immediate_alert_label(&e, &config),
            Some("Rapid disconnect after brief connection")
        );

        e.connection_duration_secs = 45.0;
        assert_eq!(immediate_alert_label(&e, &config), None);

        e.threat_score = 4;
        e.connection_duration_secs = 10.0;
        assert_eq!(immediate_alert_label(&e, &config), None);
    }

    #[test]
    fn test_rules_follow_config() {
        let config = DetectorConfig {
            suspicious_window_minutes: 1,
            ..Default::default()
        };
        let rules = ScoringRules::from_config(&config);
        let now = at(14, 10, 0);
        let history = vec![
            event(Some("Office"), 40, 600.0, at(14, 8, 0)),
            event(Some("Office"), 40, 600.0, at(14, 9, 30)),
        ];
        let result = assess_with_rules(&event(None, 40, 600.0, now), &history, false, &rules);
        assert_eq!(result.raw_points, 0);
    }
}
