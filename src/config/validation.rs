//! Configuration validation utilities and rules

use crate::{
    config::env::EnvManager,
    error::Result,
    models::Config,
};
use colored::{Color, Colorize};
use std::net::IpAddr;

/// Configuration validator with advisory rules on top of `Config::validate`
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration with comprehensive checks
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(Self::validate_server_settings(config));
        warnings.extend(Self::validate_mail_settings(config));
        warnings.extend(Self::validate_speedtest_url(&config.speedtest.base_url));
        warnings.extend(Self::validate_speedtest_settings(config));

        for problem in EnvManager::validate_current_env() {
            warnings.push(ValidationWarning::new(ValidationLevel::Warning, problem));
        }

        Ok(warnings)
    }

    fn validate_server_settings(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if let Ok(ip) = config.bind_address.parse::<IpAddr>() {
            if ip.is_unspecified() {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!("Server listens on all interfaces ({})", config.listen_address()),
                ));
            }
        }

        if config.port < 1024 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Port {} is privileged and may require elevated permissions", config.port),
            ));
        }

        if config.max_upload_bytes as u64 > crate::defaults::MAX_DOWNLOAD_BYTES {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Upload limit of {} bytes is larger than the download limit; clients may hold large bodies in flight",
                    config.max_upload_bytes
                ),
            ));
        }

        warnings
    }

    fn validate_mail_settings(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        let missing = config.mail.missing_vars();
        if !missing.is_empty() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Mail relay disabled, submissions will fail until set: {}",
                    missing.join(", ")
                ),
            ));
        }

        match config.mail.smtp_port {
            587 | 25 | 2525 => {}
            465 => warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                "SMTP port 465 expects implicit TLS, but the relay negotiates STARTTLS".to_string(),
            )),
            port => warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("SMTP relay uses non-standard port {}", port),
            )),
        }

        warnings
    }

    /// Validate the speed test base URL with detailed checks
    fn validate_speedtest_url(base_url: &str) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        // Config::validate already rejected unparsable URLs
        let Ok(parsed) = url::Url::parse(base_url) else {
            return warnings;
        };

        if parsed.path() != "/" && !parsed.path().is_empty() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Speed test URL '{}' has path '{}', which is ignored; endpoints are resolved from the host root",
                    base_url,
                    parsed.path()
                ),
            ));
        }

        if parsed.query().is_some() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Speed test URL '{}' includes query parameters, which are dropped", base_url),
            ));
        }

        let local = match parsed.host() {
            Some(url::Host::Ipv4(ip)) => ip.is_loopback() || ip.is_private(),
            Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
            Some(url::Host::Domain(domain)) => domain == "localhost",
            None => false,
        };

        if local {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Speed test URL '{}' targets a local network; results reflect the LAN, not the ISP link", base_url),
            ));
        } else if parsed.scheme() == "http" {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Speed test URL '{}' uses plain HTTP across networks; proxies may cache or compress", base_url),
            ));
        }

        warnings
    }

    /// Validate performance-related settings
    fn validate_speedtest_settings(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let settings = &config.speedtest;

        if settings.duration_secs > 30 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Phase duration of {}s makes a full test take over {}s",
                    settings.duration_secs,
                    settings.duration_secs * 2
                ),
            ));
        } else if settings.duration_secs < 3 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Phase duration of {}s may not reach a steady transfer rate", settings.duration_secs),
            ));
        }

        if settings.block_size < 64 * 1024 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Block size of {} bytes adds per-request overhead and may understate throughput",
                    settings.block_size
                ),
            ));
        }

        if settings.sample_interval() >= settings.duration() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                "Sample interval is not shorter than the phase duration; no live samples will be shown".to_string(),
            ));
        }

        if settings.request_timeout() < settings.duration() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Request timeout ({}s) is shorter than the phase duration; large blocks on slow links may time out",
                    settings.request_timeout_secs
                ),
            ));
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Info,
    Warning,
    Error,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Get color for terminal display
    pub fn color(&self) -> Color {
        match self {
            Self::Info => Color::Blue,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        let tag = format!("[{}]", self.level.as_str());
        if use_color {
            format!("{} {}", tag.color(self.level.color()).bold(), self.message)
        } else {
            format!("{} {}", tag, self.message)
        }
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
