//! History Module
//!
//! Bounded, time-windowed stores feeding the scorer and pattern detectors.
//!
//! ## Structure
//! - `types`: `SignalSample`, `DisconnectEvent`, `DisconnectReason`, `EventSummary`
//! - `signal`: Signal History Store (1h trailing window)
//! - `disconnect`: Disconnect History Store (`pattern_memory_hours` window)

pub mod types;
pub mod signal;
pub mod disconnect;

pub use types::{DisconnectEvent, DisconnectReason, EventSummary, SignalSample};
pub use signal::{SignalDrop, SignalHistory};
pub use disconnect::DisconnectHistory;
