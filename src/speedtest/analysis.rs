//! Speed ratings and advice shown with a finished report

use crate::models::SpeedTestReport;
use crate::types::{SpeedRating, TestPhase};

/// Rate a download speed in Mbps
pub fn rate_download(mbps: f64) -> SpeedRating {
    if mbps >= 100.0 {
        SpeedRating::Excellent
    } else if mbps >= 50.0 {
        SpeedRating::Good
    } else if mbps >= 25.0 {
        SpeedRating::Fair
    } else {
        SpeedRating::Poor
    }
}

/// Rate an upload speed in Mbps
pub fn rate_upload(mbps: f64) -> SpeedRating {
    if mbps >= 50.0 {
        SpeedRating::Excellent
    } else if mbps >= 25.0 {
        SpeedRating::Good
    } else if mbps >= 10.0 {
        SpeedRating::Fair
    } else {
        SpeedRating::Poor
    }
}

/// Rate a round-trip latency in milliseconds (lower is better)
pub fn rate_latency(ms: f64) -> SpeedRating {
    if ms < 20.0 {
        SpeedRating::Excellent
    } else if ms < 50.0 {
        SpeedRating::Good
    } else if ms < 100.0 {
        SpeedRating::Fair
    } else {
        SpeedRating::Poor
    }
}

/// Rating for a phase value
pub fn rate(phase: TestPhase, value: f64) -> SpeedRating {
    match phase {
        TestPhase::Latency => rate_latency(value),
        TestPhase::Download => rate_download(value),
        TestPhase::Upload => rate_upload(value),
    }
}

/// What a rating means for everyday use
pub fn advice(phase: TestPhase, rating: SpeedRating) -> &'static str {
    match (phase, rating) {
        (TestPhase::Download, SpeedRating::Excellent) => "Perfect for 4K streaming and heavy downloads",
        (TestPhase::Download, SpeedRating::Good) => "Suitable for HD streaming and gaming",
        (TestPhase::Download, SpeedRating::Fair) => "Good for basic streaming and browsing",
        (TestPhase::Download, SpeedRating::Poor) => "May struggle with streaming and downloads",

        (TestPhase::Upload, SpeedRating::Excellent) => "Perfect for video calls and file uploads",
        (TestPhase::Upload, SpeedRating::Good) => "Good for most upload tasks",
        (TestPhase::Upload, SpeedRating::Fair) => "Suitable for basic uploads",
        (TestPhase::Upload, SpeedRating::Poor) => "May struggle with large file uploads",

        (TestPhase::Latency, SpeedRating::Excellent) => "Perfect for competitive gaming",
        (TestPhase::Latency, SpeedRating::Good) => "Great for online gaming",
        (TestPhase::Latency, SpeedRating::Fair) => "Acceptable for most applications",
        (TestPhase::Latency, SpeedRating::Poor) => "May experience lag in real-time applications",
    }
}

/// One line of analysis for a measured phase
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseAssessment {
    pub phase: TestPhase,
    pub value: f64,
    pub rating: SpeedRating,
    pub advice: &'static str,
}

/// Assess every phase of the report that produced a value
pub fn assess(report: &SpeedTestReport) -> Vec<PhaseAssessment> {
    [
        (TestPhase::Download, report.download_mbps()),
        (TestPhase::Upload, report.upload_mbps()),
        (TestPhase::Latency, report.latency_ms()),
    ]
    .into_iter()
    .filter_map(|(phase, value)| {
        value.map(|value| {
            let rating = rate(phase, value);
            PhaseAssessment {
                phase,
                value,
                rating,
                advice: advice(phase, rating),
            }
        })
    })
    .collect()
}
