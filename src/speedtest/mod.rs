//! Bandwidth test
//!
//! Runs the latency probe, the download phase and the upload phase one
//! after another against a test server. Each rate phase moves fixed-size
//! blocks until its time budget is spent; any transfer error ends that
//! phase and marks it unavailable without affecting the others.

pub mod analysis;
pub mod client;
pub mod rate;

pub use client::{HttpThroughputClient, ThroughputClient};
pub use rate::{megabits_per_second, RateMeter};

use crate::{
    error::{AppError, Result},
    logging::Logger,
    models::{PhaseSummary, RateSample, SpeedTestReport, SpeedTestSettings},
    types::{PhaseOutcome, TestPhase},
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Receives instantaneous samples while a phase runs
pub type SampleObserver<'a> = dyn Fn(&RateSample) + Send + Sync + 'a;

/// Clears the in-progress flag when a run ends, however it ends
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Sequential latency/download/upload tester
pub struct SpeedTester {
    client: Arc<dyn ThroughputClient>,
    server: String,
    phase_duration: Duration,
    block_size: usize,
    sample_interval: Duration,
    in_progress: AtomicBool,
    logger: Option<Logger>,
}

impl SpeedTester {
    /// Tester talking HTTP to `settings.base_url`
    pub fn new(settings: &SpeedTestSettings) -> Result<Self> {
        let client = HttpThroughputClient::new(&settings.base_url, settings.request_timeout())?;
        Ok(Self::with_client(Arc::new(client), settings))
    }

    /// Tester using any throughput client
    pub fn with_client(client: Arc<dyn ThroughputClient>, settings: &SpeedTestSettings) -> Self {
        Self {
            client,
            server: settings.base_url.clone(),
            phase_duration: settings.duration(),
            block_size: settings.block_size,
            sample_interval: settings.sample_interval(),
            in_progress: AtomicBool::new(false),
            logger: None,
        }
    }

    /// Override the per-phase time budget
    pub fn with_phase_duration(mut self, duration: Duration) -> Self {
        self.phase_duration = duration;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn is_running(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    /// Run all three phases without live samples
    pub async fn run(&self) -> Result<SpeedTestReport> {
        self.run_with_observer(&|_| {}).await
    }

    /// Run all three phases, passing each instantaneous sample to `observer`.
    ///
    /// Fails only when another run on this tester has not finished yet.
    pub async fn run_with_observer(&self, observer: &SampleObserver<'_>) -> Result<SpeedTestReport> {
        if self
            .in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AppError::test_execution("A speed test is already running"));
        }
        let _guard = RunGuard(&self.in_progress);

        let mut report = SpeedTestReport::new(self.server.clone());

        report.latency = self.measure_latency().await;
        self.log_phase(TestPhase::Latency, &report.latency).await;

        report.download = self.run_download(observer).await;
        self.log_phase(TestPhase::Download, &report.download.outcome).await;

        report.upload = self.run_upload(observer).await;
        self.log_phase(TestPhase::Upload, &report.upload.outcome).await;

        report.finish();
        Ok(report)
    }

    /// Round trip of one probe request, in whole milliseconds
    async fn measure_latency(&self) -> PhaseOutcome {
        let start = Instant::now();
        match self.client.ping().await {
            Ok(()) => PhaseOutcome::measured(start.elapsed().as_millis() as f64),
            Err(e) => PhaseOutcome::unavailable(e.to_string()),
        }
    }

    async fn run_download(&self, observer: &SampleObserver<'_>) -> PhaseSummary {
        let mut meter = RateMeter::start(TestPhase::Download);
        let interval = self.sample_interval;

        let mut result = Ok(());
        while meter.elapsed() < self.phase_duration {
            let transfer = self
                .client
                .download_block(self.block_size, &mut |chunk: usize| {
                    meter.record(chunk as u64);
                    if meter.since_last_sample() >= interval {
                        if let Some(sample) = meter.sample() {
                            observer(&sample);
                        }
                    }
                })
                .await;

            if let Err(e) = transfer {
                result = Err(e);
                break;
            }
        }

        summarize(meter, result)
    }

    async fn run_upload(&self, observer: &SampleObserver<'_>) -> PhaseSummary {
        let mut meter = RateMeter::start(TestPhase::Upload);
        let block = vec![0u8; self.block_size];

        let mut result = Ok(());
        while meter.elapsed() < self.phase_duration {
            if let Err(e) = self.client.upload_block(block.clone()).await {
                result = Err(e);
                break;
            }

            meter.record(block.len() as u64);
            if let Some(sample) = meter.sample() {
                observer(&sample);
            }
        }

        summarize(meter, result)
    }

    async fn log_phase(&self, phase: TestPhase, outcome: &PhaseOutcome) {
        let Some(logger) = &self.logger else {
            return;
        };

        match outcome {
            PhaseOutcome::Measured { value } => {
                logger.info(&format!("{} phase completed", phase))
                    .field("phase", phase)
                    .field("value", value)
                    .field("unit", phase.unit())
                    .log()
                    .await;
            }
            PhaseOutcome::Unavailable { reason } => {
                logger.warn(&format!("{} phase unavailable", phase))
                    .field("phase", phase)
                    .field("reason", reason)
                    .log()
                    .await;
            }
        }
    }
}

fn summarize(meter: RateMeter, result: Result<()>) -> PhaseSummary {
    let elapsed = meter.elapsed();
    let outcome = match result {
        Ok(()) => PhaseOutcome::measured(meter.final_rate(elapsed)),
        Err(e) => PhaseOutcome::unavailable(e.to_string()),
    };

    PhaseSummary {
        phase: meter.phase(),
        outcome,
        total_bytes: meter.total_bytes(),
        elapsed,
        sample_count: meter.sample_count(),
        peak_mbps: meter.peak_mbps(),
    }
}
