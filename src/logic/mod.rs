//! Logic Module - Detection Engine
//!
//! Chứa các thành phần phát hiện tấn công deauth:
//! - `connection/` - Snapshot + connection edge tracker
//! - `history/` - Signal & disconnect stores
//! - `threat/` - Threat scorer (0-10)
//! - `patterns/` - Rapid / temporal / targeting / interference detectors
//! - `alerts/` - Alert types + emitter
//! - `monitor/` - Public facade

pub mod error;
pub mod config;

pub mod connection;
pub mod history;
pub mod threat;
pub mod patterns;
pub mod alerts;
pub mod monitor;

// Scheduling & demo
pub mod analysis_loop;
pub mod simulate;
