//! Simulated Sampler - Demo Mode
//!
//! Sinh snapshot giả để demo / test mà không cần card WiFi thật.
//! Same `record_snapshot` path as a real sampler.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::logic::connection::{ConnectionSnapshot, SnapshotSource};
use crate::logic::error::MonitorError;

/// Connected stream with signal jitter and occasional deauth bursts
pub struct SimulatedSource {
    rng: StdRng,
    ssid: String,
    base_signal: u8,
    jitter: u8,
    /// Chance per sample that a burst starts
    attack_chance: f64,
    /// Connected flags still to play for the current burst
    pending: VecDeque<bool>,
    bursts_started: u64,
}

impl SimulatedSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ssid: "DemoNet".to_string(),
            base_signal: 75,
            jitter: 8,
            attack_chance: 0.01,
            pending: VecDeque::new(),
            bursts_started: 0,
        }
    }

    pub fn with_network(mut self, ssid: &str, base_signal: u8) -> Self {
        self.ssid = ssid.to_string();
        self.base_signal = base_signal.min(100);
        self
    }

    pub fn with_attack_chance(mut self, chance: f64) -> Self {
        self.attack_chance = chance.clamp(0.0, 1.0);
        self
    }

    pub fn bursts_started(&self) -> u64 {
        self.bursts_started
    }

    /// Next snapshot stamped `at`
    pub fn next_at(&mut self, at: DateTime<Local>) -> ConnectionSnapshot {
        if self.pending.is_empty() && self.rng.gen_bool(self.attack_chance) {
            let cycles = self.rng.gen_range(3..=5);
            for _ in 0..cycles {
                self.pending.push_back(false);
                self.pending.push_back(true);
            }
            self.bursts_started += 1;
            log::debug!("[SIMULATE] deauth burst of {} cycles on {}", cycles, self.ssid);
        }

        match self.pending.pop_front() {
            Some(false) => ConnectionSnapshot::disconnected(at),
            _ => {
                let jitter = self.jitter as i16;
                let offset = self.rng.gen_range(-jitter..=jitter);
                let signal = (self.base_signal as i16 + offset).clamp(1, 100) as u8;
                ConnectionSnapshot::connected(&self.ssid, signal, at)
                    .with_channel(6)
                    .with_security("WPA2-Personal", "CCMP")
            }
        }
    }
}

impl SnapshotSource for SimulatedSource {
    fn sample(&mut self) -> Result<ConnectionSnapshot, MonitorError> {
        Ok(self.next_at(Local::now()))
    }
}

/// Deterministic snapshot sequences
pub mod scenario {
    use chrono::{DateTime, Duration, Local};

    use crate::logic::connection::ConnectionSnapshot;

    /// `cycles` short connections, each `connected_secs` long, starting every `period_secs`
    pub fn deauth_burst(
        ssid: &str,
        signal: u8,
        start: DateTime<Local>,
        cycles: usize,
        connected_secs: i64,
        period_secs: i64,
    ) -> Vec<ConnectionSnapshot> {
        let mut out = Vec::with_capacity(cycles * 2);
        for i in 0..cycles as i64 {
            let up = start + Duration::seconds(i * period_secs);
            out.push(ConnectionSnapshot::connected(ssid, signal, up));
            out.push(ConnectionSnapshot::disconnected(up + Duration::seconds(connected_secs)));
        }
        out
    }

    /// Drops exactly every `interval_secs`, reconnecting `downtime_secs` after each
    pub fn periodic_drops(
        ssid: &str,
        start: DateTime<Local>,
        count: usize,
        interval_secs: i64,
        downtime_secs: i64,
    ) -> Vec<ConnectionSnapshot> {
        let mut out = vec![ConnectionSnapshot::connected(ssid, 60, start)];
        for i in 1..=count as i64 {
            let down = start + Duration::seconds(i * interval_secs);
            out.push(ConnectionSnapshot::disconnected(down));
            out.push(ConnectionSnapshot::connected(
                ssid,
                60,
                down + Duration::seconds(downtime_secs),
            ));
        }
        out
    }

    /// Connected samples alternating between `low` and `high`
    pub fn interference(
        ssid: &str,
        start: DateTime<Local>,
        samples: usize,
        low: u8,
        high: u8,
        every_secs: i64,
    ) -> Vec<ConnectionSnapshot> {
        (0..samples as i64)
            .map(|i| {
                let signal = if i % 2 == 0 { low } else { high };
                ConnectionSnapshot::connected(ssid, signal, start + Duration::seconds(i * every_secs))
            })
            .collect()
    }

    pub fn stable(
        ssid: &str,
        signal: u8,
        start: DateTime<Local>,
        samples: usize,
        every_secs: i64,
    ) -> Vec<ConnectionSnapshot> {
        (0..samples as i64)
            .map(|i| ConnectionSnapshot::connected(ssid, signal, start + Duration::seconds(i * every_secs)))
            .collect()
    }
}
