//! Temporal Regularity Detection
//!
//! Mất kết nối theo chu kỳ đều đặn = script tấn công tự động.
//!
//! Same idea as C2 beaconing: low jitter between consecutive events.
//! Here jitter is the mean absolute deviation of the intervals, in seconds.

use chrono::{DateTime, Local};

use crate::logic::alerts::{Alert, PatternKind};
use crate::logic::config::DetectorConfig;
use crate::logic::history::DisconnectEvent;

pub const NAME: &str = "temporal_regularity";

const THREAT_SCORE: u8 = 8;

/// Interval statistics for a sequence of timestamps
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalStats {
    pub intervals: Vec<f64>,
    pub mean_interval: f64,
    pub mean_abs_deviation: f64,
}

/// Intervals between consecutive timestamps (must be ascending)
pub fn interval_stats(timestamps: &[DateTime<Local>]) -> Option<IntervalStats> {
    if timestamps.len() < 2 {
        return None;
    }

    let intervals: Vec<f64> = timestamps
        .windows(2)
        .map(|w| (w[1] - w[0]).num_milliseconds() as f64 / 1000.0)
        .collect();

    let mean_interval = intervals.iter().sum::<f64>() / intervals.len() as f64;
    let mean_abs_deviation = intervals
        .iter()
        .map(|i| (i - mean_interval).abs())
        .sum::<f64>()
        / intervals.len() as f64;

    Some(IntervalStats {
        intervals,
        mean_interval,
        mean_abs_deviation,
    })
}

/// `events` are the disconnects inside the temporal window, oldest first
pub fn detect(events: &[DisconnectEvent], config: &DetectorConfig, now: DateTime<Local>) -> Option<Alert> {
    if events.len() < config.temporal_min_events {
        return None;
    }

    let timestamps: Vec<DateTime<Local>> = events.iter().map(|e| e.captured_at).collect();
    let stats = interval_stats(&timestamps)?;

    if stats.mean_abs_deviation < config.temporal_max_deviation_secs
        && stats.mean_interval < config.temporal_max_interval_secs
    {
        log::debug!(
            "[TEMPORAL] {} events, mean interval {:.1}s, deviation {:.1}s",
            events.len(),
            stats.mean_interval,
            stats.mean_abs_deviation
        );
        Some(Alert::new(
            PatternKind::TemporalRegularity,
            "Automated attack pattern detected",
            THREAT_SCORE,
            format!("Regular disconnect pattern every {:.0}s", stats.mean_interval),
            now,
        ))
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
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 10, 14, 0, 0).unwrap()
    }

    fn events_at(offsets_secs: &[i64]) -> Vec<DisconnectEvent> {
        offsets_secs
            .iter()
            .map(|&off| {
                let at = base() + Duration::seconds(off);
                DisconnectEvent::new(&ConnectionSnapshot::connected("Office", 60, at), 300.0, at)
            })
            .collect()
    }

    #[test]
    fn test_regular_intervals_fire() {
        let config = DetectorConfig::default();
        let events = events_at(&[0, 300, 601, 899, 1200]);
        let alert = detect(&events, &config, base() + Duration::seconds(1210)).expect("should fire");
        assert_eq!(alert.threat_score, 8);
        assert_eq!(alert.details, "Regular disconnect pattern every 300s");
    }

    #[test]
    fn test_random_intervals_do_not_fire() {
        let config = DetectorConfig::default();
        // gaps 50, 900, 120, 700
        let events = events_at(&[0, 50, 950, 1070, 1770]);
        assert!(detect(&events, &config, base() + Duration::seconds(1800)).is_none());
    }

    #[test]
    fn test_regular_but_slow_does_not_fire() {
        let config = DetectorConfig::default();
        let events = events_at(&[0, 700, 1400, 2100]);
        assert!(detect(&events, &config, base() + Duration::seconds(2200)).is_none());
    }

    #[test]
    fn test_needs_minimum_events() {
        let config = DetectorConfig::default();
        let events = events_at(&[0, 60, 120]);
        assert!(detect(&events, &config, base() + Duration::seconds(130)).is_none());
    }

    #[test]
    fn test_interval_stats() {
        let ts: Vec<_> = [0i64, 50, 950, 1070, 1770]
            .iter()
            .map(|&s| base() + Duration::seconds(s))
            .collect();
        let stats = interval_stats(&ts).unwrap();
        assert_eq!(stats.intervals, vec![50.0, 900.0, 120.0, 700.0]);
        assert!((stats.mean_interval - 442.5).abs() < 1e-9);
        assert!((stats.mean_abs_deviation - 357.5).abs() < 1e-9);
        assert!(interval_stats(&ts[..1]).is_none());
    }
}
