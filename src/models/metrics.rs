//! Bandwidth test samples and results

use crate::types::{PhaseOutcome, TestPhase};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Instantaneous rate observed while a phase is running
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSample {
    /// Phase that produced the sample
    pub phase: TestPhase,

    /// Time since the phase started
    pub elapsed: Duration,

    /// Bytes transferred since the phase started
    pub total_bytes: u64,

    /// Rate over the window since the previous sample
    pub mbps: f64,
}

/// Outcome of one rate phase (download or upload)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSummary {
    pub phase: TestPhase,

    /// Final average rate in Mbps, or unavailable
    pub outcome: PhaseOutcome,

    /// Bytes moved before the phase ended or aborted
    pub total_bytes: u64,

    /// Wall time the phase ran for
    pub elapsed: Duration,

    /// Number of instantaneous samples taken
    pub sample_count: usize,

    /// Highest instantaneous rate seen
    pub peak_mbps: Option<f64>,
}

impl PhaseSummary {
    /// Placeholder for a phase that has not run yet
    pub fn pending(phase: TestPhase) -> Self {
        Self {
            phase,
            outcome: PhaseOutcome::unavailable("not run"),
            total_bytes: 0,
            elapsed: Duration::ZERO,
            sample_count: 0,
            peak_mbps: None,
        }
    }

    pub fn mbps(&self) -> Option<f64> {
        self.outcome.value()
    }
}

/// Complete result of a speed test run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedTestReport {
    /// Base URL the test ran against
    pub server: String,

    /// Round-trip time of the probe request in milliseconds
    pub latency: PhaseOutcome,

    pub download: PhaseSummary,

    pub upload: PhaseSummary,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run completed
    pub completed_at: Option<DateTime<Utc>>,
}

impl SpeedTestReport {
    pub fn new(server: String) -> Self {
        Self {
            server,
            latency: PhaseOutcome::unavailable("not run"),
            download: PhaseSummary::pending(TestPhase::Download),
            upload: PhaseSummary::pending(TestPhase::Upload),
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn latency_ms(&self) -> Option<f64> {
        self.latency.value()
    }

    pub fn download_mbps(&self) -> Option<f64> {
        self.download.mbps()
    }

    pub fn upload_mbps(&self) -> Option<f64> {
        self.upload.mbps()
    }

    /// Mark the run complete
    pub fn finish(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Number of phases (out of three) that produced a value
    pub fn available_count(&self) -> usize {
        [&self.latency, &self.download.outcome, &self.upload.outcome]
            .iter()
            .filter(|o| o.is_available())
            .count()
    }

    /// Total run time, if the run completed
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.completed_at.map(|end| end - self.started_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report_has_nothing_available() {
        let report = SpeedTestReport::new("http://127.0.0.1:3000".to_string());
        assert_eq!(report.available_count(), 0);
        assert!(report.latency_ms().is_none());
        assert!(report.download_mbps().is_none());
        assert!(report.duration().is_none());
    }

    #[test]
    fn test_available_count() {
        let mut report = SpeedTestReport::new("http://127.0.0.1:3000".to_string());
        report.latency = PhaseOutcome::measured(12.0);
        report.upload.outcome = PhaseOutcome::measured(8.5);
        report.finish();

        assert_eq!(report.available_count(), 2);
        assert_eq!(report.upload_mbps(), Some(8.5));
        assert!(report.duration().is_some());
    }
}
