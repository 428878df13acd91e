//! Thillai Cable backend - main CLI application
//!
//! Runs the site's HTTP backend (lead relay and speed test endpoints) and a
//! command-line bandwidth test against it.

use clap::Parser;
use colored::Colorize;
use std::process;
use thillai_cable::{app::App, cli::Cli, error::AppError};

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        eprintln!("Please report this issue at: https://github.com/sridharan01234/thillai-cable/issues");
        process::exit(1);
    }));

    let cli = Cli::parse();
    let use_color = cli.color_override().unwrap_or(true);

    let result = match App::new(cli) {
        Ok(app) => app.run().await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("{}", e.format_for_console(use_color));
        print_error_suggestions(&e, use_color);
        process::exit(e.exit_code());
    }
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError, use_color: bool) {
    let heading = |text: &str| {
        if use_color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    };

    match error {
        AppError::Config(_) => {
            eprintln!();
            eprintln!("{}", heading("Configuration help:"));
            eprintln!("  - Check your .env file format (`thillai env-example` prints a template)");
            eprintln!("  - SPEEDTEST_URL must start with http:// or https://");
            eprintln!("  - BIND_ADDRESS must be an IP address");
            eprintln!("  - SPEEDTEST_DURATION must be between 1 and 60");
        }
        AppError::Network(_) | AppError::HttpRequest(_) | AppError::Timeout(_) => {
            eprintln!();
            eprintln!("{}", heading("Network troubleshooting:"));
            eprintln!("  - Check that `thillai serve` is running on the target host");
            eprintln!("  - Verify the --url value and any firewall in between");
        }
        AppError::Io(_) => {
            eprintln!();
            eprintln!("{}", heading("Server troubleshooting:"));
            eprintln!("  - Another process may already use the port; try --port");
            eprintln!("  - Ports below 1024 need elevated permissions");
        }
        AppError::Mail(_) => {
            eprintln!();
            eprintln!("{}", heading("Mail relay help:"));
            eprintln!("  - Set SMTP_USERNAME, SMTP_PASSWORD and ADMIN_EMAIL");
            eprintln!("  - Gmail accounts need an app password");
        }
        _ => {
            let message = error.user_friendly_message();
            if let Some((_, suggestion)) = message.split_once("\n\n") {
                eprintln!();
                eprintln!("{}", suggestion);
            }
        }
    }
}
