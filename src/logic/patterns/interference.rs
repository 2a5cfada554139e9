//! Signal Interference Detection
//!
//! Tín hiệu dao động mạnh + trung bình yếu = có thể bị jamming/nhiễu,
//! khác với deauth "sạch" (tín hiệu mạnh rồi mất đột ngột).

use chrono::{DateTime, Local};

use crate::logic::alerts::{Alert, PatternKind};
use crate::logic::config::DetectorConfig;
use crate::logic::history::SignalSample;

pub const NAME: &str = "signal_interference";

const THREAT_SCORE: u8 = 6;

/// Mean and population variance; variance is 0 for fewer than two values
pub fn mean_and_variance(values: &[u8]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, 0.0);
    }
    let variance = values
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    (mean, variance)
}

/// `samples` are the signal readings inside the interference window
pub fn detect(samples: &[SignalSample], config: &DetectorConfig, now: DateTime<Local>) -> Vec<Alert> {
    if samples.len() < config.interference_min_samples {
        return vec![];
    }

    let mut by_ssid: Vec<(&str, Vec<u8>)> = Vec::new();
    for sample in samples {
        let Some(ssid) = sample.ssid.as_deref() else {
            continue;
        };
        match by_ssid.iter_mut().find(|(s, _)| *s == ssid) {
            Some((_, values)) => values.push(sample.signal_percent),
            None => by_ssid.push((ssid, vec![sample.signal_percent])),
        }
    }

    let mut alerts = Vec::new();
    for (ssid, values) in by_ssid {
        if values.len() < config.interference_min_samples {
            continue;
        }

        let (mean, variance) = mean_and_variance(&values);
        if variance > config.interference_min_variance && mean < config.interference_max_mean {
            log::debug!(
                "[INTERFERENCE] {}: {} samples, mean {:.1}%, variance {:.0}",
                ssid,
                values.len(),
                mean,
                variance
            );
            alerts.push(
                Alert::new(
                    PatternKind::SignalInterference,
                    format!("Signal interference detected on {}", ssid),
                    THREAT_SCORE,
                    format!("High signal variance ({:.0}) on {}", variance, ssid),
                    now,
                )
                .with_network(Some(ssid)),
            );
        }
    }
    alerts
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn samples(ssid: &str, values: &[u8]) -> Vec<SignalSample> {
        let t0 = Local.with_ymd_and_hms(2025, 6, 10, 14, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| SignalSample {
                ssid: Some(ssid.to_string()),
                signal_percent: v,
                channel: 11,
                captured_at: t0 + Duration::seconds(i as i64 * 30),
            })
            .collect()
    }

    #[test]
    fn test_mean_and_variance() {
        let (mean, var) = mean_and_variance(&[10, 90, 10, 90]);
        assert!((mean - 50.0).abs() < 1e-9);
        assert!((var - 1600.0).abs() < 1e-9);
        assert_eq!(mean_and_variance(&[42]), (42.0, 0.0));
        assert_eq!(mean_and_variance(&[]), (0.0, 0.0));
    }

    #[test]
    fn test_volatile_weak_signal_fires() {
        let config = DetectorConfig::default();
        let values: Vec<u8> = (0..10).map(|i| if i % 2 == 0 { 10 } else { 85 }).collect();
        let alerts = detect(&samples("Cafe", &values), &config, Local::now());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].threat_score, 6);
        assert_eq!(alerts[0].ssid.as_deref(), Some("Cafe"));
        assert_eq!(alerts[0].details, "High signal variance (1406) on Cafe");
    }

    #[test]
    fn test_mean_of_exactly_fifty_does_not_fire() {
        let config = DetectorConfig::default();
        let values: Vec<u8> = (0..10).map(|i| if i % 2 == 0 { 10 } else { 90 }).collect();
        assert!(detect(&samples("Cafe", &values), &config, Local::now()).is_empty());
    }

    #[test]
    fn test_steady_signal_is_quiet() {
        let config = DetectorConfig::default();
        let alerts = detect(&samples("Office", &[30; 12]), &config, Local::now());
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_per_ssid_minimum() {
        let config = DetectorConfig::default();
        let mut mixed = samples("Cafe", &[10, 85, 10, 85, 10, 85]);
        mixed.extend(samples("Office", &[10, 85, 10, 85, 10, 85]));
        assert!(detect(&mixed, &config, Local::now()).is_empty());
    }
}
