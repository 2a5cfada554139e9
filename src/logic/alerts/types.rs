//! Alert Types
//!
//! Cảnh báo gửi tới subscribers (GUI, webhook, logger). Transient - không lưu trữ.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// PATTERN KIND
// ============================================================================

/// Which detector raised the alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternKind {
    RapidDisconnect,
    TemporalRegularity,
    NetworkTargeting,
    SignalInterference,
    ImmediateHighThreat,
}

impl PatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::RapidDisconnect => "rapid_disconnect",
            PatternKind::TemporalRegularity => "temporal_regularity",
            PatternKind::NetworkTargeting => "network_targeting",
            PatternKind::SignalInterference => "signal_interference",
            PatternKind::ImmediateHighThreat => "immediate_high_threat",
        }
    }
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// SEVERITY
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum AlertSeverity {
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

impl AlertSeverity {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=3 => AlertSeverity::Low,
            4..=5 => AlertSeverity::Medium,
            6..=7 => AlertSeverity::High,
            _ => AlertSeverity::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Low => "low",
            AlertSeverity::Medium => "medium",
            AlertSeverity::High => "high",
            AlertSeverity::Critical => "critical",
        }
    }
}

// ============================================================================
// ALERT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub raised_at: DateTime<Local>,
    pub pattern: PatternKind,
    /// Short label, e.g. "Rapid disconnect pattern detected"
    pub reason: String,
    /// 0-10
    pub threat_score: u8,
    pub details: String,
    /// Network the alert is about, when there is one
    pub ssid: Option<String>,
}

impl Alert {
    pub fn new(
        pattern: PatternKind,
        reason: impl Into<String>,
        threat_score: u8,
        details: impl Into<String>,
        raised_at: DateTime<Local>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            raised_at,
            pattern,
            reason: reason.into(),
            threat_score: threat_score.min(10),
            details: details.into(),
            ssid: None,
        }
    }

    pub fn with_network(mut self, ssid: Option<&str>) -> Self {
        self.ssid = ssid.map(|s| s.to_string());
        self
    }

    pub fn severity(&self) -> AlertSeverity {
        AlertSeverity::from_score(self.threat_score)
    }

    /// Details with the network appended, as shown to users
    pub fn display_details(&self) -> String {
        match &self.ssid {
            Some(ssid) => format!("{} (Network: {})", self.details, ssid),
            None => self.details.clone(),
        }
    }

    /// Timestamp in the log format used by external consumers
    pub fn timestamp_str(&self) -> String {
        self.raised_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
