//! Threat Types
//!
//! Kết quả chấm điểm cho một lần mất kết nối.
//! KHÔNG chứa logic - chỉ data structures.

use serde::{Deserialize, Serialize};

// ============================================================================
// SCORE FACTORS
// ============================================================================

/// The six independent indicators a disconnect is scored on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactorKind {
    ConnectionDuration,
    SignalStrength,
    DisconnectFrequency,
    OffHours,
    SignalDrop,
    RepeatedTarget,
}

/// One factor that contributed points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFactor {
    pub kind: FactorKind,
    pub points: u8,
    pub reason: String,
}

// ============================================================================
// ASSESSMENT
// ============================================================================

/// Result of scoring one disconnect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatAssessment {
    /// Clamped 0-10
    pub score: u8,
    /// Sum before clamping
    pub raw_points: u32,
    pub factors: Vec<ScoreFactor>,
}

impl ThreatAssessment {
    pub fn has_factor(&self, kind: FactorKind) -> bool {
        self.factors.iter().any(|f| f.kind == kind)
    }

    /// Short human explanation, e.g. "brief connection (10s) +6, strong signal (80%) +4"
    pub fn explain(&self) -> String {
        if self.factors.is_empty() {
            return "no risk factors".to_string();
        }
        self.factors
            .iter()
            .map(|f| format!("{} +{}", f.reason, f.points))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for ThreatAssessment {
    fn default() -> Self {
        Self {
            score: 0,
            raw_points: 0,
            factors: vec![],
        }
    }
}
