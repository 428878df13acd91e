//! Command-line interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

const AFTER_HELP: &str = "\
ENVIRONMENT:
  SMTP_USERNAME        Mail account identity, used as the sender address
  SMTP_PASSWORD        Mail account credential
  ADMIN_EMAIL          Mailbox that receives lead notifications
  SMTP_HOST            SMTP relay host (default: smtp.gmail.com)
  SMTP_PORT            SMTP relay port, STARTTLS (default: 587)
  BIND_ADDRESS, PORT   Server listen address (default: 0.0.0.0:3000)
  SPEEDTEST_URL        Server used by `speedtest` (default: http://127.0.0.1:3000)
  SPEEDTEST_DURATION   Seconds per speed test phase (default: 5)
  ENABLE_COLOR         Colored output (default: true)

EXAMPLES:
  thillai serve --port 8080
  thillai speedtest --url http://127.0.0.1:8080 --duration 3
  thillai plans --json
  thillai env-example --output .env";

/// Thillai Cable site backend: lead relay, speed test endpoints and client
#[derive(Parser, Debug, Clone)]
#[command(name = "thillai")]
#[command(version, about, long_about = None)]
#[command(after_long_help = AFTER_HELP)]
pub struct Cli {
    /// Force colored output
    #[arg(long, global = true)]
    pub color: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable debug output (JSON logs)
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        /// Address to bind
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Measure latency, download and upload against a server
    Speedtest {
        /// Base URL of the server
        #[arg(long, value_name = "URL")]
        url: Option<String>,

        /// Seconds per phase (1-60)
        #[arg(short, long, value_parser = parse_duration)]
        duration: Option<u64>,

        /// Bytes per transferred block
        #[arg(long, value_name = "BYTES")]
        block_size: Option<usize>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the service plans
    Plans {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print an example .env file
    EnvExample {
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if let Command::Speedtest { block_size: Some(0), .. } = self.command {
            return Err("--block-size must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Check if colors should be enabled; `None` defers to the configuration
    pub fn color_override(&self) -> Option<bool> {
        if self.color {
            Some(true)
        } else if self.no_color || !supports_color() {
            Some(false)
        } else {
            None
        }
    }

    /// Whether the command prints machine-readable output
    pub fn wants_json(&self) -> bool {
        matches!(
            self.command,
            Command::Speedtest { json: true, .. } | Command::Plans { json: true }
        )
    }
}

/// Parse a phase duration in seconds
fn parse_duration(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid duration: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid duration: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Duration must be greater than 0".to_string())
            } else if secs > 60 {
                Err("Duration cannot exceed 60 seconds".to_string())
            } else {
                Ok(secs)
            }
        })
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
