//! History Types
//!
//! Data records owned by the signal and disconnect stores.
//! KHÔNG chứa logic lưu trữ - chỉ data structures.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::logic::connection::ConnectionSnapshot;

// ============================================================================
// SIGNAL SAMPLE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSample {
    pub ssid: Option<String>,
    pub signal_percent: u8,
    pub channel: u32,
    pub captured_at: DateTime<Local>,
}

impl SignalSample {
    /// Sample from a connected snapshot; `None` when there is nothing to record
    pub fn from_snapshot(snapshot: &ConnectionSnapshot) -> Option<Self> {
        if !snapshot.has_signal() {
            return None;
        }
        Some(Self {
            ssid: snapshot.ssid.clone(),
            signal_percent: snapshot.signal_percent,
            channel: snapshot.channel,
            captured_at: snapshot.captured_at,
        })
    }
}

// ============================================================================
// DISCONNECT REASON
// ============================================================================

/// Best guess at why the link dropped, from the last signal reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisconnectReason {
    /// Signal was strong - legit drops rarely look like this
    StrongSignal,
    WeakSignal,
    Normal,
}

impl DisconnectReason {
    pub fn guess(last_signal_percent: u8) -> Self {
        if last_signal_percent > 70 {
            DisconnectReason::StrongSignal
        } else if last_signal_percent < 30 {
            DisconnectReason::WeakSignal
        } else {
            DisconnectReason::Normal
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DisconnectReason::StrongSignal => "Strong signal disconnect (possible deauth)",
            DisconnectReason::WeakSignal => "Weak signal disconnect",
            DisconnectReason::Normal => "Normal signal disconnect",
        }
    }
}

impl std::fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// ============================================================================
// DISCONNECT EVENT
// ============================================================================

/// One observed connected -> disconnected edge, annotated with its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisconnectEvent {
    pub captured_at: DateTime<Local>,
    pub ssid: Option<String>,
    pub last_signal_percent: u8,
    pub connection_duration_secs: f64,
    pub channel: u32,
    pub auth_type: String,
    /// 0-10
    pub threat_score: u8,
    pub reason: DisconnectReason,
    /// Already counted by a rapid-disconnect alert (mark dedup policy)
    #[serde(default)]
    pub rapid_alerted: bool,
}

impl DisconnectEvent {
    /// Unscored event built from the last connected snapshot
    pub fn new(
        last_connected: &ConnectionSnapshot,
        connection_duration_secs: f64,
        captured_at: DateTime<Local>,
    ) -> Self {
        Self {
            captured_at,
            ssid: last_connected.ssid.clone(),
            last_signal_percent: last_connected.signal_percent,
            connection_duration_secs: connection_duration_secs.max(0.0),
            channel: last_connected.channel,
            auth_type: last_connected.auth_type.clone(),
            threat_score: 0,
            reason: DisconnectReason::guess(last_connected.signal_percent),
            rapid_alerted: false,
        }
    }

    pub fn ssid_or_unknown(&self) -> &str {
        self.ssid.as_deref().unwrap_or("Unknown")
    }

    pub fn summary(&self) -> EventSummary {
        EventSummary {
            captured_at: self.captured_at,
            ssid: self.ssid_or_unknown().to_string(),
            threat_score: self.threat_score,
            reason: self.reason.description().to_string(),
            duration_secs: self.connection_duration_secs,
        }
    }
}

/// Display row for the recent-events view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub captured_at: DateTime<Local>,
    pub ssid: String,
    pub threat_score: u8,
    pub reason: String,
    pub duration_secs: f64,
}
