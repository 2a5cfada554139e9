//! Monitor Errors
//!
//! The core never surfaces these from `record_snapshot` / `tick`; they are
//! handed to error listeners on the alert emitter and to the log.

/// Faults the monitor can observe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorError {
    /// External sampler failed to produce a snapshot
    Sampler { message: String },
    /// Configuration value out of range
    InvalidConfig { field: &'static str, reason: String },
    /// Alert sink refused the alert (closed channel, ...)
    Delivery { subscriber: String, message: String },
    /// Alert sink panicked while handling an alert
    SubscriberPanicked { subscriber: String, message: String },
    /// A pattern detector panicked during a tick
    DetectorPanicked { detector: &'static str, message: String },
}

impl MonitorError {
    pub fn sampler(message: impl Into<String>) -> Self {
        MonitorError::Sampler { message: message.into() }
    }

    /// Extract a readable message from a `catch_unwind` payload
    pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
        if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        }
    }
}

impl std::fmt::Display for MonitorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonitorError::Sampler { message } => write!(f, "Sampler error: {}", message),
            MonitorError::InvalidConfig { field, reason } => {
                write!(f, "Invalid config '{}': {}", field, reason)
            }
            MonitorError::Delivery { subscriber, message } => {
                write!(f, "Alert delivery to '{}' failed: {}", subscriber, message)
            }
            MonitorError::SubscriberPanicked { subscriber, message } => {
                write!(f, "Subscriber '{}' panicked: {}", subscriber, message)
            }
            MonitorError::DetectorPanicked { detector, message } => {
                write!(f, "Detector '{}' panicked: {}", detector, message)
            }
        }
    }
}

impl std::error::Error for MonitorError {}
