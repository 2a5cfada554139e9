//! Disconnect History Store
//!
//! Mục đích: Lưu các sự kiện mất kết nối đã chấm điểm trong cửa sổ
//! `pattern_memory_hours` (mặc định 24 giờ).
//!
//! Events are kept ordered by `captured_at` ascending.

use chrono::{DateTime, Duration, Local};

use super::types::DisconnectEvent;

pub struct DisconnectHistory {
    events: Vec<DisconnectEvent>,
    retention: Duration,
}

impl DisconnectHistory {
    pub fn new(retention: Duration) -> Self {
        Self {
            events: Vec::new(),
            retention,
        }
    }

    /// Insert in time order, then prune relative to the newest event
    pub fn record(&mut self, event: DisconnectEvent) {
        let at = event.captured_at;
        let idx = self.events.partition_point(|e| e.captured_at <= at);
        self.events.insert(idx, event);

        if let Some(newest) = self.newest() {
            self.prune(newest);
        }
    }

    /// Drop events older than `now - retention`; returns how many were removed
    pub fn prune(&mut self, now: DateTime<Local>) -> usize {
        let cutoff = now - self.retention;
        let before = self.events.len();
        self.events.retain(|e| e.captured_at > cutoff);
        let removed = before - self.events.len();
        if removed > 0 {
            log::debug!("Pruned {} disconnect events older than {}", removed, cutoff);
        }
        removed
    }

    /// Events strictly newer than `cutoff`, oldest first
    pub fn since(&self, cutoff: DateTime<Local>) -> Vec<DisconnectEvent> {
        let start = self.events.partition_point(|e| e.captured_at <= cutoff);
        self.events[start..].to_vec()
    }

    /// Events inside the trailing `window` ending at `now`, oldest first
    pub fn within(&self, window: Duration, now: DateTime<Local>) -> Vec<DisconnectEvent> {
        self.since(now - window)
            .into_iter()
            .filter(|e| e.captured_at <= now)
            .collect()
    }

    /// Remove events at or before `cutoff`
    pub fn clear_up_to(&mut self, cutoff: DateTime<Local>) -> usize {
        let end = self.events.partition_point(|e| e.captured_at <= cutoff);
        self.events.drain(..end).count()
    }

    /// Remove events strictly newer than `cutoff` (the alerted cluster)
    pub fn clear_after(&mut self, cutoff: DateTime<Local>) -> usize {
        let start = self.events.partition_point(|e| e.captured_at <= cutoff);
        self.events.drain(start..).count()
    }

    /// Flag events newer than `cutoff` as already counted by a rapid alert
    pub fn mark_rapid_alerted(&mut self, cutoff: DateTime<Local>) -> usize {
        let mut marked = 0;
        for event in self.events.iter_mut().filter(|e| e.captured_at > cutoff) {
            if !event.rapid_alerted {
                event.rapid_alerted = true;
                marked += 1;
            }
        }
        marked
    }

    pub fn all(&self) -> &[DisconnectEvent] {
        &self.events
    }

    pub fn newest(&self) -> Option<DateTime<Local>> {
        self.events.last().map(|e| e.captured_at)
    }

    pub fn oldest(&self) -> Option<DateTime<Local>> {
        self.events.first().map(|e| e.captured_at)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

// ============================================================================
// TESTS
// ============================================================================
