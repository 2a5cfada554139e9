//! Threat Module
//!
//! Chấm điểm mỗi lần mất kết nối trên thang 0-10.
//! Đây là CORE STEP - nơi quyết định một disconnect có giống deauth hay không.
//!
//! ## Structure
//! - `types`: Core types (ThreatAssessment, ScoreFactor, FactorKind)
//! - `rules`: Points and thresholds per factor
//! - `scorer`: Pure scoring function + immediate alert rule
//!
//! ## Usage
//! ```ignore
//! use wifi_deauth_core::logic::threat::{assess, score};
//!
//! let result = assess(&event, &recent, signal_dropped);
//! println!("{}/10: {}", result.score, result.explain());
//! ```

pub mod types;
pub mod rules;
pub mod scorer;

// Re-export main types for convenience
pub use types::{FactorKind, ScoreFactor, ThreatAssessment};

pub use rules::{ScoringRules, MAX_SCORE, SIGNAL_DROP_WINDOW_MINUTES};

pub use scorer::{assess, assess_with_rules, immediate_alert_label, score};
