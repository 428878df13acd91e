//! Data models and structures

pub mod config;
pub mod metrics;
pub mod plan;
pub mod submission;

// Re-export main model types
pub use config::{Config, MailCredentials, MailSettings, SpeedTestSettings};
pub use metrics::{PhaseSummary, RateSample, SpeedTestReport};
pub use plan::{Plan, PlanCatalog, PlanFeature};
pub use submission::{ContactForm, ContactSubmission, FieldError, QuoteForm, QuoteSubmission, ValidationErrors};
