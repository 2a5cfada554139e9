//! WiFi Deauth Detector - Core Library
//!
//! Consumes WiFi connection snapshots, scores every disconnect and raises
//! alerts for deauthentication-attack patterns.

pub mod constants;
pub mod logic;

pub use logic::alerts::{Alert, AlertEmitter, AlertSeverity, AlertSink, PatternKind};
pub use logic::analysis_loop::{LoopHandle, LoopTiming};
pub use logic::config::{DetectorConfig, RapidDedup};
pub use logic::connection::{ConnectionSnapshot, SnapshotSource};
pub use logic::error::MonitorError;
pub use logic::history::{DisconnectEvent, DisconnectReason, EventSummary, SignalSample};
pub use logic::monitor::{DeauthMonitor, MonitorStats};
pub use logic::threat::{score, ThreatAssessment};
