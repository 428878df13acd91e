//! Main application orchestration and execution

use crate::{
    cli::{Cli, Command},
    config::{display_config_summary, load_config, validate_config, EnvManager, ValidationLevel, ValidationWarning},
    error::{AppError, Result},
    logging::{LogLevel, Logger},
    models::{Config, PlanCatalog, RateSample},
    output::{to_json, OutputFormatter, OutputFormatterFactory},
    server,
    speedtest::SpeedTester,
    types::TestPhase,
};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    /// Create a new application instance with CLI configuration
    pub fn new(cli: Cli) -> Result<Self> {
        cli.validate().map_err(AppError::config)?;
        Ok(Self { cli })
    }

    /// Run the selected subcommand
    pub async fn run(self) -> Result<()> {
        // Needs no configuration, so a broken .env cannot block it
        if let Command::EnvExample { output } = &self.cli.command {
            return write_env_example(output.as_deref());
        }

        let config = load_config(self.cli.clone())?;
        let warnings = validate_config(&config)?;

        if config.debug {
            eprintln!("{} v{}", crate::PKG_NAME, crate::VERSION);
            eprintln!("\nConfiguration Summary:");
            eprintln!("{}\n", display_config_summary(&config));
        }

        match self.cli.command {
            Command::Serve { .. } => run_server(config, &warnings).await,
            Command::Speedtest { json, .. } => {
                show_warnings(&config, &warnings);
                run_speedtest(&config, json).await
            }
            Command::Plans { json } => show_plans(&config, json),
            Command::EnvExample { .. } => Ok(()),
        }
    }
}

async fn run_server(config: Config, warnings: &[ValidationWarning]) -> Result<()> {
    let logger = Logger::with_config("SERVER", &config, LogLevel::Info);

    for warning in warnings {
        let level = match warning.level {
            ValidationLevel::Info => LogLevel::Info,
            ValidationLevel::Warning => LogLevel::Warn,
            ValidationLevel::Error => LogLevel::Error,
        };
        logger.log(level, &warning.message).field("source", "config").log().await;
    }

    server::serve(config, logger).await
}

/// Configuration warnings for the client commands are only shown in verbose mode
fn show_warnings(config: &Config, warnings: &[ValidationWarning]) {
    if !config.verbose || warnings.is_empty() {
        return;
    }

    eprintln!("Configuration Warnings:");
    for warning in warnings {
        eprintln!("  {}", warning.format(config.enable_color));
    }
    eprintln!();
}

async fn run_speedtest(config: &Config, json: bool) -> Result<()> {
    let logger = Logger::with_config("SPEEDTEST", config, LogLevel::Warn);
    let tester = SpeedTester::new(&config.speedtest)?.with_logger(logger);

    if json {
        let report = tester.run().await?;
        println!("{}", to_json(&report)?);
        return Ok(());
    }

    let formatter = OutputFormatterFactory::create_formatter(config.enable_color, config.verbose);
    println!("{}", formatter.format_header(&format!("Speed test: {}", config.speedtest.base_url))?);

    let live = LiveSamples::new(formatter.as_ref());
    let report = tester.run_with_observer(&|sample: &RateSample| live.show(sample)).await?;
    live.finish();

    println!("{}", formatter.format_report(&report)?);

    if report.available_count() == 0 {
        eprintln!("{}", formatter.format_warning("No phase could be measured; is the server running?"));
    }

    Ok(())
}

/// Redraws the current sample on one stderr line per phase
struct LiveSamples<'a> {
    formatter: &'a dyn OutputFormatter,
    phase: Mutex<Option<TestPhase>>,
}

impl<'a> LiveSamples<'a> {
    fn new(formatter: &'a dyn OutputFormatter) -> Self {
        Self {
            formatter,
            phase: Mutex::new(None),
        }
    }

    fn show(&self, sample: &RateSample) {
        let mut stderr = std::io::stderr().lock();
        if let Ok(mut current) = self.phase.lock() {
            if current.is_some_and(|phase| phase != sample.phase) {
                let _ = writeln!(stderr);
            }
            *current = Some(sample.phase);
        }
        let _ = write!(stderr, "\r{}", self.formatter.format_sample(sample));
        let _ = stderr.flush();
    }

    fn finish(&self) {
        if let Ok(current) = self.phase.lock() {
            if current.is_some() {
                eprintln!();
            }
        }
    }
}

fn show_plans(config: &Config, json: bool) -> Result<()> {
    let catalog = PlanCatalog::current();

    if json {
        println!("{}", to_json(&catalog)?);
    } else {
        let formatter = OutputFormatterFactory::create_formatter(config.enable_color, config.verbose);
        println!("{}", formatter.format_plans(&catalog)?);
    }

    Ok(())
}

fn write_env_example(output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            EnvManager::save_example_env_file(path)?;
            eprintln!("Wrote example configuration to {}", path.display());
        }
        None => print!("{}", EnvManager::create_example_env_content()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::MemoryTransport;
    use clap::Parser;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_app_rejects_conflicting_flags() {
        let cli = Cli::parse_from(["thillai", "--color", "--no-color", "plans"]);
        let error = App::new(cli).err().unwrap();
        assert!(matches!(error, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_env_example_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("example.env");
        let cli = Cli::parse_from(["thillai", "env-example", "--output", path.to_str().unwrap()]);

        App::new(cli).unwrap().run().await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("SMTP_USERNAME="));
    }

    #[test]
    fn test_live_samples_track_phase_changes() {
        let formatter = OutputFormatterFactory::create_formatter(false, false);
        let live = LiveSamples::new(formatter.as_ref());
        let sample = |phase| RateSample {
            phase,
            elapsed: std::time::Duration::from_millis(200),
            total_bytes: 65_536,
            mbps: 2.5,
        };

        live.show(&sample(TestPhase::Download));
        assert_eq!(*live.phase.lock().unwrap(), Some(TestPhase::Download));
        live.show(&sample(TestPhase::Upload));
        assert_eq!(*live.phase.lock().unwrap(), Some(TestPhase::Upload));
        live.finish();
    }

    #[tokio::test]
    async fn test_speedtest_with_live_display() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let (logger, _) = Logger::in_memory("TEST", LogLevel::Error);
        let state = server::AppState::with_transport(
            Arc::new(Config::default()),
            Arc::new(MemoryTransport::new()),
            logger,
        );
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let shutdown = async {
                let _ = rx.await;
            };
            server::run(listener, state, shutdown).await.unwrap();
        });

        let mut config = Config::default();
        config.enable_color = false;
        config.speedtest.base_url = base_url;
        config.speedtest.duration_secs = 1;
        config.speedtest.block_size = 64 * 1024;

        let result = run_speedtest(&config, false).await;

        let _ = tx.send(());
        let _ = handle.await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_env_example_write_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("example.env");
        assert!(write_env_example(Some(&path)).is_err());
    }
}
