//! Connection Snapshot
//!
//! Mục đích: Trạng thái WiFi tại một thời điểm, do sampler bên ngoài cung cấp.
//! The core never queries the OS; it only consumes these.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::logic::error::MonitorError;

/// Placeholder used when the sampler could not read auth/cipher
pub const UNKNOWN_SECURITY: &str = "Unknown";

pub const UNKNOWN_SSID: &str = "Unknown";

/// One sampling tick worth of WiFi state. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSnapshot {
    pub connected: bool,
    pub ssid: Option<String>,
    /// 0-100
    pub signal_percent: u8,
    pub channel: u32,
    pub auth_type: String,
    pub cipher: String,
    pub captured_at: DateTime<Local>,
}

impl ConnectionSnapshot {
    /// Connected snapshot with unknown channel / security
    pub fn connected(ssid: &str, signal_percent: u8, captured_at: DateTime<Local>) -> Self {
        let ssid = ssid.trim();
        Self {
            connected: true,
            ssid: if ssid.is_empty() { None } else { Some(ssid.to_string()) },
            signal_percent: signal_percent.min(100),
            channel: 0,
            auth_type: UNKNOWN_SECURITY.to_string(),
            cipher: UNKNOWN_SECURITY.to_string(),
            captured_at,
        }
    }

    /// Disconnected snapshot (the sampler's default status)
    pub fn disconnected(captured_at: DateTime<Local>) -> Self {
        Self {
            connected: false,
            ssid: None,
            signal_percent: 0,
            channel: 0,
            auth_type: UNKNOWN_SECURITY.to_string(),
            cipher: UNKNOWN_SECURITY.to_string(),
            captured_at,
        }
    }

    pub fn with_channel(mut self, channel: u32) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_security(mut self, auth_type: &str, cipher: &str) -> Self {
        self.auth_type = auth_type.to_string();
        self.cipher = cipher.to_string();
        self
    }

    /// SSID for display, "Unknown" when the sampler had none
    pub fn ssid_or_unknown(&self) -> &str {
        self.ssid.as_deref().unwrap_or(UNKNOWN_SSID)
    }

    /// Whether this snapshot should land in the signal history
    pub fn has_signal(&self) -> bool {
        self.connected && self.signal_percent > 0
    }
}

// ============================================================================
// SAMPLER SEAM
// ============================================================================

/// External observation sampler.
///
/// Implementations own their OS calls and timeouts. `sample` runs on a
/// blocking thread, never while a store lock is held.
pub trait SnapshotSource: Send + 'static {
    fn sample(&mut self) -> Result<ConnectionSnapshot, MonitorError>;
}

impl<F> SnapshotSource for F
where
    F: FnMut() -> Result<ConnectionSnapshot, MonitorError> + Send + 'static,
{
    fn sample(&mut self) -> Result<ConnectionSnapshot, MonitorError> {
        self()
    }
}
