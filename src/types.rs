//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Phase of a bandwidth test run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestPhase {
    /// Round-trip probe against the ping endpoint
    Latency,
    /// Server-to-client throughput
    Download,
    /// Client-to-server throughput
    Upload,
}

impl TestPhase {
    /// Human-readable phase name
    pub fn name(&self) -> &'static str {
        match self {
            TestPhase::Latency => "Latency",
            TestPhase::Download => "Download",
            TestPhase::Upload => "Upload",
        }
    }

    /// Unit the phase result is reported in
    pub fn unit(&self) -> &'static str {
        match self {
            TestPhase::Latency => "ms",
            TestPhase::Download | TestPhase::Upload => "Mbps",
        }
    }
}

impl fmt::Display for TestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a single phase: a number or "unavailable"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PhaseOutcome {
    /// Phase completed; value is in the phase's unit
    Measured { value: f64 },
    /// Phase aborted; the reason is kept for verbose output only
    Unavailable { reason: String },
}

impl PhaseOutcome {
    pub fn measured(value: f64) -> Self {
        Self::Measured { value }
    }

    pub fn unavailable<S: Into<String>>(reason: S) -> Self {
        Self::Unavailable { reason: reason.into() }
    }

    /// Numeric value, if the phase produced one
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Measured { value } => Some(*value),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Measured { .. })
    }
}

/// Speed classification shown next to each result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl SpeedRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedRating::Excellent => "Excellent",
            SpeedRating::Good => "Good",
            SpeedRating::Fair => "Fair",
            SpeedRating::Poor => "Poor",
        }
    }
}

impl fmt::Display for SpeedRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
