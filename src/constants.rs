//! Central Configuration Constants
//!
//! Single source of truth for environment variable names and the defaults
//! the detector falls back to when nothing is set.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "WiFi Deauth Detector";

// ============================================
// Environment variable names
// ============================================

pub const ENV_RAPID_THRESHOLD: &str = "DEAUTH_RAPID_THRESHOLD";
pub const ENV_SUSPICIOUS_WINDOW_MINUTES: &str = "DEAUTH_SUSPICIOUS_WINDOW_MINUTES";
pub const ENV_SIGNAL_DROP_THRESHOLD: &str = "DEAUTH_SIGNAL_DROP_THRESHOLD";
pub const ENV_MIN_CONNECTION_SECS: &str = "DEAUTH_MIN_CONNECTION_SECS";
pub const ENV_PATTERN_MEMORY_HOURS: &str = "DEAUTH_PATTERN_MEMORY_HOURS";
pub const ENV_SAMPLE_INTERVAL_MS: &str = "DEAUTH_SAMPLE_INTERVAL_MS";
pub const ENV_ANALYSIS_INTERVAL_SECS: &str = "DEAUTH_ANALYSIS_INTERVAL_SECS";
pub const ENV_RAPID_DEDUP: &str = "DEAUTH_RAPID_DEDUP";

/// How long the demo binary runs before exiting (0 = until Ctrl-C)
pub const ENV_DEMO_SECONDS: &str = "DEAUTH_DEMO_SECONDS";

/// Seed for the simulated snapshot source
pub const ENV_DEMO_SEED: &str = "DEAUTH_DEMO_SEED";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Parse an env var, falling back to `default` when unset or malformed
pub fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Ignoring invalid value for {}: {:?}", name, raw);
                default
            }
        },
        Err(_) => default,
    }
}

/// Get demo run length from environment (0 = run until interrupted)
pub fn get_demo_seconds() -> u64 {
    env_or(ENV_DEMO_SECONDS, 0)
}

/// Get demo RNG seed from environment
pub fn get_demo_seed() -> u64 {
    env_or(ENV_DEMO_SEED, 404)
}
