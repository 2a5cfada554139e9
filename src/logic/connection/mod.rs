//! Connection Module
//!
//! Snapshots from the external sampler and the connected/disconnected edge
//! tracker that turns them into disconnect candidates.
//!
//! ## Structure
//! - `snapshot`: `ConnectionSnapshot` + `SnapshotSource` (sampler seam)
//! - `tracker`: edge detection and connection duration bookkeeping

pub mod snapshot;
pub mod tracker;

pub use snapshot::{ConnectionSnapshot, SnapshotSource};
pub use tracker::{ConnectionTracker, Transition};
