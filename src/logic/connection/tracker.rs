//! Connection Edge Tracker
//!
//! Mục đích: Phát hiện chuyển trạng thái connected -> disconnected.
//! One disconnect candidate per real edge; repeated disconnected ticks yield nothing.

use chrono::{DateTime, Local};

use super::snapshot::ConnectionSnapshot;

/// What a snapshot changed relative to the previous one
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// No state change worth acting on
    Unchanged,
    /// disconnected -> connected (or first snapshot already connected)
    Connected,
    /// connected -> disconnected
    Disconnected {
        /// Last snapshot seen while still connected
        last_connected: ConnectionSnapshot,
        /// Seconds between connect and disconnect edges
        connection_duration_secs: f64,
        at: DateTime<Local>,
    },
}

#[derive(Debug, Default)]
pub struct ConnectionTracker {
    previous_connected: Option<bool>,
    last_connected: Option<ConnectionSnapshot>,
    connected_since: Option<DateTime<Local>>,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next snapshot
    pub fn observe(&mut self, snapshot: &ConnectionSnapshot) -> Transition {
        let was_connected = self.previous_connected.replace(snapshot.connected);

        match (was_connected, snapshot.connected) {
            (Some(true), true) => {
                self.last_connected = Some(snapshot.clone());
                Transition::Unchanged
            }
            (None, true) | (Some(false), true) => {
                self.connected_since = Some(snapshot.captured_at);
                self.last_connected = Some(snapshot.clone());
                Transition::Connected
            }
            (Some(true), false) => {
                let since = self.connected_since.take();
                let connection_duration_secs = since
                    .map(|start| {
                        let millis = (snapshot.captured_at - start).num_milliseconds();
                        (millis.max(0) as f64) / 1000.0
                    })
                    .unwrap_or(0.0);

                let last_connected = self
                    .last_connected
                    .take()
                    .unwrap_or_else(|| ConnectionSnapshot::disconnected(snapshot.captured_at));

                Transition::Disconnected {
                    last_connected,
                    connection_duration_secs,
                    at: snapshot.captured_at,
                }
            }
            (None, false) | (Some(false), false) => Transition::Unchanged,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.previous_connected.unwrap_or(false)
    }

    pub fn connected_since(&self) -> Option<DateTime<Local>> {
        self.connected_since
    }

    /// Current SSID while connected
    pub fn current_ssid(&self) -> Option<&str> {
        if self.is_connected() {
            self.last_connected.as_ref().and_then(|s| s.ssid.as_deref())
        } else {
            None
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
