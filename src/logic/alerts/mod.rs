//! Alerts Module
//!
//! Boundary to external consumers: GUI, webhook posting and loggers all
//! subscribe here. The core never formats for a specific platform.
//!
//! ## Structure
//! - `types`: `Alert`, `PatternKind`, `AlertSeverity`
//! - `emitter`: `AlertEmitter`, `AlertSink`, `AlertStats`

pub mod types;
pub mod emitter;

pub use types::{Alert, AlertSeverity, PatternKind};
pub use emitter::{AlertEmitter, AlertSink, AlertStats, ChannelSink};
