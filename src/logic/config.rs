//! Detector Configuration
//!
//! Thresholds và windows cho toàn bộ detection pipeline.
//! Built once and handed to the monitor; never mutated at runtime.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::constants::{
    env_or, ENV_ANALYSIS_INTERVAL_SECS, ENV_MIN_CONNECTION_SECS, ENV_PATTERN_MEMORY_HOURS,
    ENV_RAPID_DEDUP, ENV_RAPID_THRESHOLD, ENV_SAMPLE_INTERVAL_MS, ENV_SIGNAL_DROP_THRESHOLD,
    ENV_SUSPICIOUS_WINDOW_MINUTES,
};
use super::error::MonitorError;

/// Longest accepted window, in hours (one year)
pub const MAX_WINDOW_HOURS: i64 = 24 * 365;
pub const MAX_WINDOW_MINUTES: i64 = MAX_WINDOW_HOURS * 60;

// ============================================================================
// RAPID DISCONNECT DEDUP POLICY
// ============================================================================

/// What the rapid-disconnect detector does with a cluster it already alerted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RapidDedup {
    /// Delete the cluster from the disconnect store
    ClearWindow,
    /// Keep the cluster but flag it so it no longer counts toward the rapid threshold
    MarkAlerted,
}

impl RapidDedup {
    pub fn as_str(&self) -> &'static str {
        match self {
            RapidDedup::ClearWindow => "clear",
            RapidDedup::MarkAlerted => "mark",
        }
    }
}

impl std::str::FromStr for RapidDedup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "clear" | "clear_window" => Ok(RapidDedup::ClearWindow),
            "mark" | "mark_alerted" => Ok(RapidDedup::MarkAlerted),
            other => Err(format!("unknown dedup policy '{}'", other)),
        }
    }
}

// ============================================================================
// DETECTOR CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Disconnects inside the suspicious window that make a rapid pattern
    pub rapid_disconnect_threshold: usize,
    /// Rapid-disconnect and frequency-factor window
    pub suspicious_window_minutes: i64,
    /// Signal swing (percentage points) considered suspicious
    pub signal_drop_threshold: u8,
    /// Connections shorter than this are "brief"
    pub minimum_connection_secs: f64,
    /// Disconnect history retention
    pub pattern_memory_hours: i64,
    /// Signal history retention
    pub signal_memory_minutes: i64,

    pub temporal_window_hours: i64,
    pub temporal_min_events: usize,
    pub temporal_max_deviation_secs: f64,
    pub temporal_max_interval_secs: f64,

    pub targeting_window_hours: i64,
    pub targeting_min_disconnects: usize,

    pub interference_window_minutes: i64,
    pub interference_min_samples: usize,
    pub interference_min_variance: f64,
    pub interference_max_mean: f64,

    /// Score at or above which a single disconnect alerts immediately
    pub immediate_alert_threshold: u8,
    /// Lower bar for disconnects that follow a brief connection
    pub brief_connection_alert_threshold: u8,

    /// Sampler period
    pub sample_interval_ms: u64,
    /// Pattern analysis period
    pub analysis_interval_secs: u64,
    /// Pause after a sampler failure
    pub error_backoff_secs: u64,

    pub rapid_dedup: RapidDedup,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            rapid_disconnect_threshold: 3,
            suspicious_window_minutes: 5,
            signal_drop_threshold: 30,
            minimum_connection_secs: 30.0,
            pattern_memory_hours: 24,
            signal_memory_minutes: 60,
            temporal_window_hours: 2,
            temporal_min_events: 4,
            temporal_max_deviation_secs: 30.0,
            temporal_max_interval_secs: 600.0,
            targeting_window_hours: 1,
            targeting_min_disconnects: 3,
            interference_window_minutes: 10,
            interference_min_samples: 10,
            interference_min_variance: 400.0,
            interference_max_mean: 50.0,
            immediate_alert_threshold: 7,
            brief_connection_alert_threshold: 5,
            sample_interval_ms: 1000,
            analysis_interval_secs: 15,
            error_backoff_secs: 5,
            rapid_dedup: RapidDedup::ClearWindow,
        }
    }
}

impl DetectorConfig {
    /// Defaults overlaid with `DEAUTH_*` environment variables
    pub fn from_env() -> Self {
        let base = Self::default();
        Self {
            rapid_disconnect_threshold: env_or(ENV_RAPID_THRESHOLD, base.rapid_disconnect_threshold),
            suspicious_window_minutes: env_or(ENV_SUSPICIOUS_WINDOW_MINUTES, base.suspicious_window_minutes),
            signal_drop_threshold: env_or(ENV_SIGNAL_DROP_THRESHOLD, base.signal_drop_threshold),
            minimum_connection_secs: env_or(ENV_MIN_CONNECTION_SECS, base.minimum_connection_secs),
            pattern_memory_hours: env_or(ENV_PATTERN_MEMORY_HOURS, base.pattern_memory_hours),
            sample_interval_ms: env_or(ENV_SAMPLE_INTERVAL_MS, base.sample_interval_ms),
            analysis_interval_secs: env_or(ENV_ANALYSIS_INTERVAL_SECS, base.analysis_interval_secs),
            rapid_dedup: env_or(ENV_RAPID_DEDUP, base.rapid_dedup),
            ..base
        }
    }

    /// Reject values that would make a detector meaningless
    pub fn validate(&self) -> Result<(), MonitorError> {
        fn positive(field: &'static str, ok: bool) -> Result<(), MonitorError> {
            if ok {
                Ok(())
            } else {
                Err(MonitorError::InvalidConfig {
                    field,
                    reason: "must be greater than zero".to_string(),
                })
            }
        }

        fn at_most(field: &'static str, value: i64, max: i64) -> Result<(), MonitorError> {
            if value <= max {
                Ok(())
            } else {
                Err(MonitorError::InvalidConfig {
                    field,
                    reason: format!("{} exceeds the maximum of {}", value, max),
                })
            }
        }

        positive("rapid_disconnect_threshold", self.rapid_disconnect_threshold > 0)?;
        positive("suspicious_window_minutes", self.suspicious_window_minutes > 0)?;
        positive("pattern_memory_hours", self.pattern_memory_hours > 0)?;
        positive("signal_memory_minutes", self.signal_memory_minutes > 0)?;
        positive("temporal_window_hours", self.temporal_window_hours > 0)?;
        positive("targeting_window_hours", self.targeting_window_hours > 0)?;
        positive("targeting_min_disconnects", self.targeting_min_disconnects > 0)?;
        positive("interference_window_minutes", self.interference_window_minutes > 0)?;
        positive("sample_interval_ms", self.sample_interval_ms > 0)?;
        positive("analysis_interval_secs", self.analysis_interval_secs > 0)?;

        // chrono::Duration panics past its range; a year is plenty for any window
        at_most("suspicious_window_minutes", self.suspicious_window_minutes, MAX_WINDOW_MINUTES)?;
        at_most("signal_memory_minutes", self.signal_memory_minutes, MAX_WINDOW_MINUTES)?;
        at_most("interference_window_minutes", self.interference_window_minutes, MAX_WINDOW_MINUTES)?;
        at_most("pattern_memory_hours", self.pattern_memory_hours, MAX_WINDOW_HOURS)?;
        at_most("temporal_window_hours", self.temporal_window_hours, MAX_WINDOW_HOURS)?;
        at_most("targeting_window_hours", self.targeting_window_hours, MAX_WINDOW_HOURS)?;

        // Interval math needs at least three gaps
        if self.temporal_min_events < 4 {
            return Err(MonitorError::InvalidConfig {
                field: "temporal_min_events",
                reason: format!("must be at least 4, got {}", self.temporal_min_events),
            });
        }
        if self.interference_min_samples < 2 {
            return Err(MonitorError::InvalidConfig {
                field: "interference_min_samples",
                reason: format!("must be at least 2, got {}", self.interference_min_samples),
            });
        }
        if self.signal_drop_threshold > 100 {
            return Err(MonitorError::InvalidConfig {
                field: "signal_drop_threshold",
                reason: format!("{} is not a percentage", self.signal_drop_threshold),
            });
        }
        if self.immediate_alert_threshold > 10 || self.brief_connection_alert_threshold > 10 {
            return Err(MonitorError::InvalidConfig {
                field: "immediate_alert_threshold",
                reason: "alert thresholds are on the 0-10 scale".to_string(),
            });
        }
        Ok(())
    }

    pub fn suspicious_window(&self) -> Duration {
        Duration::minutes(self.suspicious_window_minutes)
    }

    pub fn pattern_memory(&self) -> Duration {
        Duration::hours(self.pattern_memory_hours)
    }

    pub fn signal_memory(&self) -> Duration {
        Duration::minutes(self.signal_memory_minutes)
    }

    pub fn temporal_window(&self) -> Duration {
        Duration::hours(self.temporal_window_hours)
    }

    pub fn targeting_window(&self) -> Duration {
        Duration::hours(self.targeting_window_hours)
    }

    pub fn interference_window(&self) -> Duration {
        Duration::minutes(self.interference_window_minutes)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DetectorConfig::default();
        assert_eq!(config.rapid_disconnect_threshold, 3);
        assert_eq!(config.suspicious_window_minutes, 5);
        assert_eq!(config.pattern_memory_hours, 24);
        assert_eq!(config.analysis_interval_secs, 15);
        assert_eq!(config.rapid_dedup, RapidDedup::ClearWindow);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let config = DetectorConfig {
            suspicious_window_minutes: 0,
            ..Default::default()
        };
        match config.validate() {
            Err(MonitorError::InvalidConfig { field, .. }) => {
                assert_eq!(field, "suspicious_window_minutes")
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_windows_chrono_cannot_hold() {
        let config = DetectorConfig {
            pattern_memory_hours: i64::MAX / 2,
            ..Default::default()
        };
        match config.validate() {
            Err(MonitorError::InvalidConfig { field, .. }) => assert_eq!(field, "pattern_memory_hours"),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }

        let config = DetectorConfig {
            suspicious_window_minutes: i64::MAX / 60,
            ..Default::default()
        };
        match config.validate() {
            Err(MonitorError::InvalidConfig { field, .. }) => {
                assert_eq!(field, "suspicious_window_minutes")
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }

        let year = DetectorConfig {
            pattern_memory_hours: MAX_WINDOW_HOURS,
            signal_memory_minutes: MAX_WINDOW_MINUTES,
            ..Default::default()
        };
        assert!(year.validate().is_ok());
        assert_eq!(year.pattern_memory(), Duration::days(365));
    }

    #[test]
    fn test_validate_rejects_short_temporal_sequence() {
        let config = DetectorConfig {
            temporal_min_events: 2,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dedup_parse() {
        assert_eq!("clear".parse::<RapidDedup>(), Ok(RapidDedup::ClearWindow));
        assert_eq!("MARK_ALERTED".parse::<RapidDedup>(), Ok(RapidDedup::MarkAlerted));
        assert!("sometimes".parse::<RapidDedup>().is_err());
    }

    #[test]
    fn test_roundtrip_json() {
        let config = DetectorConfig {
            rapid_disconnect_threshold: 2,
            rapid_dedup: RapidDedup::MarkAlerted,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: DetectorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
