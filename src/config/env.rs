//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::net::IpAddr;
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    /// Load a specific env file if it exists. Variables already present in
    /// the process environment are kept.
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

            if debug {
                eprintln!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            eprintln!("No {} file found, using defaults and CLI arguments", path.display());
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# Thillai Cable Backend Configuration
#
# Values here are loaded at startup. Variables already set in the process
# environment win over this file, and command-line flags win over both.

# Mail relay (required for /api/mail and /api/submit-quote)
# The account name is also used as the sender address.
# SMTP_USERNAME=relay@thillaicable.com
# SMTP_PASSWORD=app-password
# ADMIN_EMAIL=admin@thillaicable.com

# SMTP relay (STARTTLS)
# SMTP_HOST=smtp.gmail.com
# SMTP_PORT=587

# HTTP server
# BIND_ADDRESS=0.0.0.0
# PORT=3000

# Speed test client
# SPEEDTEST_URL=http://127.0.0.1:3000
# SPEEDTEST_DURATION=5

# Enable colored output (true/false)
# ENABLE_COLOR=true
"#
        .to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        let content = Self::create_example_env_content();
        std::fs::write(path, content)
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))?;

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "SMTP_USERNAME" | "ADMIN_EMAIL" => {
                if !value.is_empty() && !crate::relay::validation::is_valid_email(value) {
                    return Err(AppError::config(format!("{} is not an e-mail address: '{}'", key, value)));
                }
            }
            "SMTP_HOST" => {
                if value.is_empty() {
                    return Err(AppError::config("SMTP_HOST cannot be empty"));
                }
            }
            "SMTP_PORT" | "PORT" => {
                let port: u16 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if port == 0 {
                    return Err(AppError::config(format!("{} must be greater than 0", key)));
                }
            }
            "BIND_ADDRESS" => {
                value.parse::<IpAddr>()
                    .map_err(|e| AppError::config(format!("Invalid BIND_ADDRESS value '{}': {}", value, e)))?;
            }
            "SPEEDTEST_URL" => {
                let parsed = url::Url::parse(value)
                    .map_err(|e| AppError::config(format!("Invalid SPEEDTEST_URL value '{}': {}", value, e)))?;
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    return Err(AppError::config(format!("SPEEDTEST_URL must use http or https: {}", value)));
                }
            }
            "SPEEDTEST_DURATION" => {
                let secs: u64 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid SPEEDTEST_DURATION value '{}': {}", value, e)))?;
                if secs == 0 || secs > 60 {
                    return Err(AppError::config(format!("SPEEDTEST_DURATION must be between 1 and 60, got: {}", secs)));
                }
            }
            "ENABLE_COLOR" => {
                value.parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e)))?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("SMTP_USERNAME", "Mail account identity and sender address", "relay@thillaicable.com"),
            ("SMTP_PASSWORD", "Mail account credential", "app-password"),
            ("ADMIN_EMAIL", "Mailbox receiving lead notifications", "admin@thillaicable.com"),
            ("SMTP_HOST", "SMTP relay host", "smtp.gmail.com"),
            ("SMTP_PORT", "SMTP relay port (STARTTLS)", "587"),
            ("BIND_ADDRESS", "Server bind address", "0.0.0.0"),
            ("PORT", "Server port", "3000"),
            ("SPEEDTEST_URL", "Server used by the speedtest command", "http://127.0.0.1:3000"),
            ("SPEEDTEST_DURATION", "Seconds per speed test phase (1-60)", "5"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<20} {}\n", var, description));
            help.push_str(&format!("  {:<20} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<String> {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(name, _, _)| {
                let value = std::env::var(name).ok()?;
                Self::validate_env_var(name, &value).err().map(|e| e.to_string())
            })
            .collect()
    }

    /// Validate the lines of an env file without loading it
    pub fn check_env_file(path: &Path) -> Result<Option<Vec<String>>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("Failed to read {}: {}", path.display(), e)))?;

        let mut warnings = Vec::new();
        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line.split_once('=') {
                Some((key, value)) => {
                    if let Err(e) = Self::validate_env_var(key.trim(), value.trim_matches('"')) {
                        warnings.push(format!("Line {}: {}", number + 1, e));
                    }
                }
                None => warnings.push(format!("Line {}: expected KEY=VALUE", number + 1)),
            }
        }

        Ok(Some(warnings))
    }
}
