//! Configuration data model and validation

use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

/// Environment variables the lead relay cannot work without
pub const REQUIRED_MAIL_VARS: [&str; 3] = ["SMTP_USERNAME", "SMTP_PASSWORD", "ADMIN_EMAIL"];

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port the HTTP server listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted upload body in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Outbound mail settings
    #[serde(default)]
    pub mail: MailSettings,

    /// Bandwidth test client settings
    #[serde(default)]
    pub speedtest: SpeedTestSettings,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

/// SMTP relay settings. Credentials stay optional here so the server can
/// start without them; each submission checks them again.
#[derive(Clone, Serialize, Deserialize)]
pub struct MailSettings {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Mail account identity, also used as the sender address
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    /// Operator mailbox that receives notifications
    #[serde(default)]
    pub admin_email: Option<String>,
}

/// Complete SMTP credentials, only obtainable when every required value is set
#[derive(Clone)]
pub struct MailCredentials {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub admin_email: String,
}

/// Settings for the `speedtest` client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedTestSettings {
    /// Base URL of the server exposing `/api/ping`, `/api/download`, `/api/upload-test`
    #[serde(default = "default_speedtest_url")]
    pub base_url: String,

    /// Wall-clock bound of each rate phase
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,

    /// Size of each transferred block
    #[serde(default = "default_block_size")]
    pub block_size: usize,

    /// Minimum spacing between instantaneous download samples
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,

    /// Per-request timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            mail: MailSettings::default(),
            speedtest: SpeedTestSettings::default(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            username: None,
            password: None,
            admin_email: None,
        }
    }
}

impl fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailSettings")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("admin_email", &self.admin_email)
            .finish()
    }
}

impl fmt::Debug for MailCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailCredentials")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("admin_email", &self.admin_email)
            .finish()
    }
}

impl Default for SpeedTestSettings {
    fn default() -> Self {
        Self {
            base_url: default_speedtest_url(),
            duration_secs: default_duration_secs(),
            block_size: default_block_size(),
            sample_interval_ms: default_sample_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl MailSettings {
    /// Names of required variables that are unset or empty
    pub fn missing_vars(&self) -> Vec<&'static str> {
        let values = [&self.username, &self.password, &self.admin_email];
        REQUIRED_MAIL_VARS
            .iter()
            .zip(values)
            .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
            .map(|(name, _)| *name)
            .collect()
    }

    /// Whether every required value is present
    pub fn is_complete(&self) -> bool {
        self.missing_vars().is_empty()
    }

    /// Resolve complete credentials or report which variables are missing
    pub fn credentials(&self) -> Result<MailCredentials> {
        let missing = self.missing_vars();
        if !missing.is_empty() {
            return Err(AppError::config(format!(
                "Missing environment variables: {}",
                missing.join(", ")
            )));
        }

        Ok(MailCredentials {
            smtp_host: self.smtp_host.clone(),
            smtp_port: self.smtp_port,
            username: self.username.clone().unwrap_or_default().trim().to_string(),
            password: self.password.clone().unwrap_or_default(),
            admin_email: self.admin_email.clone().unwrap_or_default().trim().to_string(),
        })
    }
}

impl SpeedTestSettings {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Socket address string the server binds to
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if IpAddr::from_str(&self.bind_address).is_err() {
            return Err(AppError::config(format!("Invalid bind address: {}", self.bind_address)));
        }

        let upload_request_size = self
            .speedtest
            .block_size
            .saturating_add(crate::defaults::MULTIPART_OVERHEAD_BYTES);
        if self.max_upload_bytes < upload_request_size {
            return Err(AppError::config(format!(
                "Upload limit ({} bytes) must exceed the test block size ({} bytes) by at least {} bytes",
                self.max_upload_bytes,
                self.speedtest.block_size,
                crate::defaults::MULTIPART_OVERHEAD_BYTES
            )));
        }

        if self.mail.smtp_host.trim().is_empty() {
            return Err(AppError::config("SMTP host cannot be empty"));
        }

        if self.mail.smtp_port == 0 {
            return Err(AppError::config("SMTP port must be greater than 0"));
        }

        match url::Url::parse(&self.speedtest.base_url) {
            Ok(parsed) => {
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    return Err(AppError::config(format!(
                        "Speed test URL must use http or https: {}",
                        self.speedtest.base_url
                    )));
                }
            }
            Err(e) => {
                return Err(AppError::config(format!(
                    "Invalid speed test URL '{}': {}",
                    self.speedtest.base_url, e
                )));
            }
        }

        if self.speedtest.duration_secs == 0 || self.speedtest.duration_secs > 60 {
            return Err(AppError::config(format!(
                "Speed test duration must be between 1 and 60 seconds, got: {}",
                self.speedtest.duration_secs
            )));
        }

        if self.speedtest.block_size == 0 {
            return Err(AppError::config("Block size must be greater than 0"));
        }

        if self.speedtest.block_size as u64 > crate::defaults::MAX_DOWNLOAD_BYTES {
            return Err(AppError::config(format!(
                "Block size cannot exceed {} bytes",
                crate::defaults::MAX_DOWNLOAD_BYTES
            )));
        }

        if self.speedtest.request_timeout_secs == 0 {
            return Err(AppError::config("Request timeout must be greater than 0"));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(username) = std::env::var("SMTP_USERNAME") {
            self.mail.username = Some(username);
        }

        if let Ok(password) = std::env::var("SMTP_PASSWORD") {
            self.mail.password = Some(password);
        }

        if let Ok(admin_email) = std::env::var("ADMIN_EMAIL") {
            self.mail.admin_email = Some(admin_email);
        }

        if let Ok(host) = std::env::var("SMTP_HOST") {
            self.mail.smtp_host = host.trim().to_string();
        }

        if let Ok(port) = std::env::var("SMTP_PORT") {
            self.mail.smtp_port = port.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid SMTP_PORT value '{}': {}", port, e)))?;
        }

        if let Ok(bind_address) = std::env::var("BIND_ADDRESS") {
            self.bind_address = bind_address.trim().to_string();
        }

        if let Ok(port) = std::env::var("PORT") {
            self.port = port.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid PORT value '{}': {}", port, e)))?;
        }

        if let Ok(url) = std::env::var("SPEEDTEST_URL") {
            self.speedtest.base_url = url.trim().to_string();
        }

        if let Ok(duration) = std::env::var("SPEEDTEST_DURATION") {
            self.speedtest.duration_secs = duration.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid SPEEDTEST_DURATION value '{}': {}", duration, e)))?;
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_bind_address() -> String {
    crate::defaults::DEFAULT_BIND_ADDRESS.to_string()
}

fn default_port() -> u16 {
    crate::defaults::DEFAULT_PORT
}

fn default_max_upload_bytes() -> usize {
    crate::defaults::DEFAULT_MAX_UPLOAD_BYTES
}

fn default_smtp_host() -> String {
    crate::defaults::DEFAULT_SMTP_HOST.to_string()
}

fn default_smtp_port() -> u16 {
    crate::defaults::DEFAULT_SMTP_PORT
}

fn default_speedtest_url() -> String {
    crate::defaults::DEFAULT_SPEEDTEST_URL.to_string()
}

fn default_duration_secs() -> u64 {
    crate::defaults::DEFAULT_TEST_DURATION.as_secs()
}

fn default_block_size() -> usize {
    crate::defaults::DEFAULT_BLOCK_SIZE
}

fn default_sample_interval_ms() -> u64 {
    crate::defaults::DEFAULT_SAMPLE_INTERVAL.as_millis() as u64
}

fn default_request_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_REQUEST_TIMEOUT.as_secs()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
