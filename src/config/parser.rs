//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::{Cli, Command},
    config::env::EnvManager,
    error::Result,
    models::Config,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        EnvManager::load_env_file(self.cli.debug)?;
        config.merge_from_env()?;

        self.apply_cli_overrides(&mut config);
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    pub fn apply_cli_overrides(&self, config: &mut Config) {
        match &self.cli.command {
            Command::Serve { bind, port } => {
                if let Some(bind) = bind {
                    config.bind_address = bind.clone();
                }
                if let Some(port) = port {
                    config.port = *port;
                }
            }
            Command::Speedtest { url, duration, block_size, .. } => {
                if let Some(url) = url {
                    config.speedtest.base_url = url.clone();
                }
                if let Some(duration) = duration {
                    config.speedtest.duration_secs = *duration;
                }
                if let Some(block_size) = block_size {
                    config.speedtest.block_size = *block_size;
                }
            }
            Command::Plans { .. } | Command::EnvExample { .. } => {}
        }

        if let Some(enable_color) = self.cli.color_override() {
            config.enable_color = enable_color;
        }

        // CLI-only flags
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if config.debug {
            eprintln!("Applied CLI overrides to configuration");
            eprintln!("{}", display_config_summary(config));
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let missing = config.mail.missing_vars();
    let relay = if missing.is_empty() {
        format!("enabled ({}:{})", config.mail.smtp_host, config.mail.smtp_port)
    } else {
        format!("disabled (missing {})", missing.join(", "))
    };

    let summary = [
        format!("Listen Address: {}", config.listen_address()),
        format!("Upload Limit: {} bytes", config.max_upload_bytes),
        format!("Mail Relay: {}", relay),
        format!("Speed Test URL: {}", config.speedtest.base_url),
        format!("Phase Duration: {}s", config.speedtest.duration_secs),
        format!("Block Size: {} bytes", config.speedtest.block_size),
        format!("Color Output: {}", config.enable_color),
        format!("Verbose: {}", config.verbose),
        format!("Debug: {}", config.debug),
    ];

    summary.join("\n")
}
