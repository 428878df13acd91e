//! Throughput arithmetic

use crate::models::RateSample;
use crate::types::TestPhase;
use std::time::{Duration, Instant};

/// Bits per megabit as the site reports it (binary mega)
const BITS_PER_MEGABIT: f64 = 1_048_576.0;

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Average rate in Mbps for `bytes` moved in `elapsed`.
///
/// Zero elapsed time yields 0.0.
pub fn megabits_per_second(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    round2(bytes as f64 * 8.0 / secs / BITS_PER_MEGABIT)
}

/// Tracks bytes for one phase and produces instantaneous samples
#[derive(Debug)]
pub struct RateMeter {
    phase: TestPhase,
    started: Instant,
    last_sample_at: Instant,
    last_sample_bytes: u64,
    total_bytes: u64,
    sample_count: usize,
    peak_mbps: Option<f64>,
}

impl RateMeter {
    pub fn start(phase: TestPhase) -> Self {
        let now = Instant::now();
        Self {
            phase,
            started: now,
            last_sample_at: now,
            last_sample_bytes: 0,
            total_bytes: 0,
            sample_count: 0,
            peak_mbps: None,
        }
    }

    /// Account for transferred bytes
    pub fn record(&mut self, bytes: u64) {
        self.total_bytes += bytes;
    }

    /// Time since the last sample was taken
    pub fn since_last_sample(&self) -> Duration {
        self.last_sample_at.elapsed()
    }

    /// Take an instantaneous sample over the window since the previous one.
    ///
    /// Returns `None` when no time has passed.
    pub fn sample(&mut self) -> Option<RateSample> {
        let now = Instant::now();
        let window = now.duration_since(self.last_sample_at);
        if window.is_zero() {
            return None;
        }

        let window_bytes = self.total_bytes - self.last_sample_bytes;
        let mbps = megabits_per_second(window_bytes, window);

        self.last_sample_at = now;
        self.last_sample_bytes = self.total_bytes;
        self.sample_count += 1;
        self.peak_mbps = Some(self.peak_mbps.map_or(mbps, |peak| peak.max(mbps)));

        Some(RateSample {
            phase: self.phase,
            elapsed: now.duration_since(self.started),
            total_bytes: self.total_bytes,
            mbps,
        })
    }

    pub fn phase(&self) -> TestPhase {
        self.phase
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn peak_mbps(&self) -> Option<f64> {
        self.peak_mbps
    }

    /// Final average rate over the whole phase
    pub fn final_rate(&self, elapsed: Duration) -> f64 {
        megabits_per_second(self.total_bytes, elapsed)
    }
}
