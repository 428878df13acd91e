//! Thillai Cable site backend
//!
//! Relays contact and quote-request submissions from the marketing site to
//! the operator mailbox (with an auto-reply to the requester), serves the
//! endpoints used by the bandwidth test, and runs that bandwidth test from
//! the command line.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod mail;
pub mod models;
pub mod output;
pub mod relay;
pub mod server;
pub mod speedtest;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, ContactSubmission, QuoteSubmission, SpeedTestReport};
pub use relay::LeadRelay;
pub use speedtest::SpeedTester;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 3000;
    pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
    pub const DEFAULT_SMTP_PORT: u16 = 587;

    /// Largest request body accepted by the upload endpoint
    pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;
    /// Largest JSON body accepted by the submission endpoints
    pub const MAX_SUBMISSION_BYTES: usize = 64 * 1024;
    /// Room left for multipart boundaries and part headers around an upload block
    pub const MULTIPART_OVERHEAD_BYTES: usize = 4096;
    /// Upper bound for `/api/download?bytes=`
    pub const MAX_DOWNLOAD_BYTES: u64 = 64 * 1024 * 1024;

    pub const DEFAULT_SPEEDTEST_URL: &str = "http://127.0.0.1:3000";
    pub const DEFAULT_TEST_DURATION: Duration = Duration::from_secs(5);
    pub const DEFAULT_BLOCK_SIZE: usize = 1024 * 1024;
    pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(100);
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    pub const BUSINESS_NAME: &str = "Thillai Cable";
    pub const SUPPORT_PHONE: &str = "+91 9488223480";
    pub const SUPPORT_WHATSAPP: &str = "+91 9786983480";
    pub const SUPPORT_EMAIL: &str = "support@thillaicable.com";
    pub const POSTAL_LINE: &str = "Karungallur, 636303";
}
