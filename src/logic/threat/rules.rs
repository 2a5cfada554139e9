//! Threat Scoring Rules & Thresholds
//!
//! Định nghĩa điểm cộng cho từng yếu tố khi chấm điểm một lần mất kết nối.
//! KHÔNG chứa logic score - chỉ constants và config.

use serde::{Deserialize, Serialize};

use crate::logic::config::DetectorConfig;

// ============================================================================
// SCORE SCALE
// ============================================================================

/// Highest possible threat score
pub const MAX_SCORE: u8 = 10;

// ============================================================================
// FACTOR 1: CONNECTION DURATION
// ============================================================================

/// Below this many seconds the connection was "very short"
pub const SHORT_CONNECTION_SECS: f64 = 30.0;
pub const SHORT_CONNECTION_POINTS: u8 = 6;

/// Below this many seconds the connection was "brief"
pub const BRIEF_CONNECTION_SECS: f64 = 120.0;
pub const BRIEF_CONNECTION_POINTS: u8 = 3;

// ============================================================================
// FACTOR 2: SIGNAL AT DISCONNECT
// ============================================================================

/// Above this the link was strong; strong-signal drops are abnormal
pub const STRONG_SIGNAL_PERCENT: u8 = 70;
pub const STRONG_SIGNAL_POINTS: u8 = 4;

pub const MODERATE_SIGNAL_PERCENT: u8 = 50;
pub const MODERATE_SIGNAL_POINTS: u8 = 2;

// ============================================================================
// FACTOR 3: DISCONNECT FREQUENCY
// ============================================================================

pub const FREQUENCY_WINDOW_MINUTES: i64 = 5;

pub const BURST_DISCONNECTS: usize = 3;
pub const BURST_POINTS: u8 = 8;

pub const REPEAT_DISCONNECTS: usize = 2;
pub const REPEAT_POINTS: u8 = 5;

// ============================================================================
// FACTOR 4: TIME OF DAY
// ============================================================================

/// Local hours before this are off-hours
pub const OFF_HOURS_BEFORE: u32 = 6;
/// Local hours after this are off-hours
pub const OFF_HOURS_AFTER: u32 = 22;
pub const OFF_HOURS_POINTS: u8 = 2;

// ============================================================================
// FACTOR 5: SIGNAL DROP BEFORE DISCONNECT
// ============================================================================

/// Look-back for the signal swing check
pub const SIGNAL_DROP_WINDOW_MINUTES: i64 = 2;
pub const SIGNAL_DROP_POINTS: u8 = 6;

// ============================================================================
// FACTOR 6: SAME NETWORK TARGETED
// ============================================================================

pub const SAME_SSID_DISCONNECTS: usize = 2;
pub const SAME_SSID_POINTS: u8 = 5;

// ============================================================================
// CONFIGURABLE RULES
// ============================================================================

/// Scoring knobs that follow the detector config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub frequency_window_minutes: i64,
    pub short_connection_secs: f64,
    pub brief_connection_secs: f64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            frequency_window_minutes: FREQUENCY_WINDOW_MINUTES,
            short_connection_secs: SHORT_CONNECTION_SECS,
            brief_connection_secs: BRIEF_CONNECTION_SECS,
        }
    }
}

impl ScoringRules {
    pub fn from_config(config: &DetectorConfig) -> Self {
        Self {
            frequency_window_minutes: config.suspicious_window_minutes,
            short_connection_secs: config.minimum_connection_secs,
            ..Default::default()
        }
    }
}
