//! Signal History Store
//!
//! Mục đích: Lưu các mẫu tín hiệu WiFi gần đây (mặc định 1 giờ) để phát hiện
//! nhiễu và sụt tín hiệu trước khi mất kết nối.
//!
//! Single writer (sampler), read by the analysis tick. Locking is done by the
//! owner; this type is plain data.

use chrono::{DateTime, Duration, Local};

use super::types::SignalSample;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Samples considered for the sudden-drop warning
const DROP_LOOKBACK: usize = 10;

/// Same-SSID samples needed inside the lookback before judging a drop
const DROP_MIN_SAMPLES: usize = 5;

/// Baseline must be at least this strong for a drop to matter
const DROP_MIN_BASELINE: f64 = 50.0;

/// Samples needed inside the scoring window to call a swing a drop
const RECENT_DROP_MIN_SAMPLES: usize = 5;

// ============================================================================
// STORE
// ============================================================================

pub struct SignalHistory {
    samples: Vec<SignalSample>,
    retention: Duration,
}

/// Sudden drop relative to the recent same-SSID baseline
#[derive(Debug, Clone, PartialEq)]
pub struct SignalDrop {
    pub ssid: Option<String>,
    pub baseline: f64,
    pub current: u8,
    pub drop: f64,
}

impl SignalHistory {
    pub fn new(retention: Duration) -> Self {
        Self {
            samples: Vec::new(),
            retention,
        }
    }

    /// Append a sample and prune anything outside the retention window
    pub fn record(&mut self, sample: SignalSample) {
        let newest = self.newest().map_or(sample.captured_at, |t| t.max(sample.captured_at));
        self.samples.push(sample);
        self.prune(newest);
    }

    /// Drop samples older than `now - retention`; returns how many were removed
    pub fn prune(&mut self, now: DateTime<Local>) -> usize {
        let cutoff = now - self.retention;
        let before = self.samples.len();
        self.samples.retain(|s| s.captured_at > cutoff);
        let removed = before - self.samples.len();
        if removed > 0 {
            log::debug!("Pruned {} signal samples older than {}", removed, cutoff);
        }
        removed
    }

    /// Samples for `ssid` newer than `now - window`, insertion order
    pub fn recent_for(&self, ssid: &str, window: Duration, now: DateTime<Local>) -> Vec<SignalSample> {
        let cutoff = now - window;
        self.samples
            .iter()
            .filter(|s| s.captured_at > cutoff && s.ssid.as_deref() == Some(ssid))
            .cloned()
            .collect()
    }

    /// Last `n` samples for `ssid`, insertion order
    pub fn last_n_for(&self, ssid: &str, n: usize) -> Vec<SignalSample> {
        let mut out: Vec<SignalSample> = self
            .samples
            .iter()
            .rev()
            .filter(|s| s.ssid.as_deref() == Some(ssid))
            .take(n)
            .cloned()
            .collect();
        out.reverse();
        out
    }

    /// All samples newer than `cutoff`, insertion order
    pub fn since(&self, cutoff: DateTime<Local>) -> Vec<SignalSample> {
        self.samples
            .iter()
            .filter(|s| s.captured_at > cutoff)
            .cloned()
            .collect()
    }

    /// Did `ssid` swing by more than `threshold` points inside `window`?
    pub fn had_recent_drop(
        &self,
        ssid: Option<&str>,
        window: Duration,
        now: DateTime<Local>,
        threshold: u8,
    ) -> bool {
        let Some(ssid) = ssid else {
            return false;
        };

        let recent = self.recent_for(ssid, window, now);
        if recent.len() < RECENT_DROP_MIN_SAMPLES {
            return false;
        }

        let max = recent.iter().map(|s| s.signal_percent).max().unwrap_or(0);
        let min = recent.iter().map(|s| s.signal_percent).min().unwrap_or(0);
        max - min > threshold
    }

    /// Compare the newest sample against the same-SSID average of the lookback
    pub fn sudden_drop(&self, threshold: u8) -> Option<SignalDrop> {
        if self.samples.len() < DROP_LOOKBACK {
            return None;
        }

        let current = self.samples.last()?;
        let start = self.samples.len() - DROP_LOOKBACK;
        let recent: Vec<u8> = self.samples[start..]
            .iter()
            .filter(|s| s.ssid == current.ssid)
            .map(|s| s.signal_percent)
            .collect();

        if recent.len() < DROP_MIN_SAMPLES {
            return None;
        }

        let earlier = &recent[..recent.len() - 1];
        let baseline = earlier.iter().map(|&v| v as f64).sum::<f64>() / earlier.len() as f64;
        let drop = baseline - current.signal_percent as f64;

        if drop > threshold as f64 && baseline > DROP_MIN_BASELINE {
            Some(SignalDrop {
                ssid: current.ssid.clone(),
                baseline,
                current: current.signal_percent,
                drop,
            })
        } else {
            None
        }
    }

    pub fn newest(&self) -> Option<DateTime<Local>> {
        self.samples.iter().map(|s| s.captured_at).max()
    }

    pub fn oldest(&self) -> Option<DateTime<Local>> {
        self.samples.iter().map(|s| s.captured_at).min()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

// ============================================================================
// TESTS
// ============================================================================
