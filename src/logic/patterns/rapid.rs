//! Rapid Disconnect Detection
//!
//! Nhiều lần mất kết nối trong cửa sổ ngắn = dấu hiệu deauth flood.
//!
//! After alerting, the cluster is either cleared from the store or flagged
//! (see `RapidDedup`) so the next tick does not alert on it again.

use chrono::{DateTime, Local};

use crate::logic::alerts::{Alert, PatternKind};
use crate::logic::config::{DetectorConfig, RapidDedup};
use crate::logic::history::DisconnectHistory;

pub const NAME: &str = "rapid_disconnect";

/// Points per disconnect in the cluster
const POINTS_PER_DISCONNECT: usize = 2;

pub fn detect(
    history: &mut DisconnectHistory,
    config: &DetectorConfig,
    now: DateTime<Local>,
) -> Option<Alert> {
    let cutoff = now - config.suspicious_window();

    let count = history
        .since(cutoff)
        .iter()
        .filter(|e| config.rapid_dedup == RapidDedup::ClearWindow || !e.rapid_alerted)
        .count();

    if count < config.rapid_disconnect_threshold {
        return None;
    }

    let threat_score = (count * POINTS_PER_DISCONNECT).min(10) as u8;
    let alert = Alert::new(
        PatternKind::RapidDisconnect,
        "Rapid disconnect pattern detected",
        threat_score,
        format!(
            "{} disconnects in {} minutes",
            count, config.suspicious_window_minutes
        ),
        now,
    );

    let handled = match config.rapid_dedup {
        RapidDedup::ClearWindow => history.clear_after(cutoff),
        RapidDedup::MarkAlerted => history.mark_rapid_alerted(cutoff),
    };
    log::debug!(
        "[RAPID] {} events deduplicated ({})",
        handled,
        config.rapid_dedup.as_str()
    );

    Some(alert)
}

// ============================================================================
// TESTS
// ============================================================================
