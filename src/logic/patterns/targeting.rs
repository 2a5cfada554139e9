//! Network Targeting Detection
//!
//! Một SSID bị ngắt kết nối nhiều lần trong 1 giờ = mạng đang bị nhắm tới.

use chrono::{DateTime, Local};

use crate::logic::alerts::{Alert, PatternKind};
use crate::logic::config::DetectorConfig;
use crate::logic::connection::snapshot::UNKNOWN_SSID;
use crate::logic::history::DisconnectEvent;

pub const NAME: &str = "network_targeting";

const THREAT_SCORE: u8 = 7;

/// Disconnect counts per SSID, in order of first appearance.
/// Events without a usable SSID are skipped.
pub fn count_by_ssid(events: &[DisconnectEvent]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for event in events {
        let Some(ssid) = event.ssid.as_deref() else {
            continue;
        };
        if ssid.is_empty() || ssid == UNKNOWN_SSID {
            continue;
        }
        match counts.iter_mut().find(|(s, _)| s == ssid) {
            Some((_, n)) => *n += 1,
            None => counts.push((ssid.to_string(), 1)),
        }
    }
    counts
}

/// One alert per SSID at or over the threshold
pub fn detect(events: &[DisconnectEvent], config: &DetectorConfig, now: DateTime<Local>) -> Vec<Alert> {
    count_by_ssid(events)
        .into_iter()
        .filter(|(_, count)| *count >= config.targeting_min_disconnects)
        .map(|(ssid, count)| {
            Alert::new(
                PatternKind::NetworkTargeting,
                format!("Network targeting detected: {}", ssid),
                THREAT_SCORE,
                format!(
                    "Network '{}' targeted {} times in {} hour(s)",
                    ssid, count, config.targeting_window_hours
                ),
                now,
            )
            .with_network(Some(&ssid))
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
