//! Lead submission data models
//!
//! The `*Form` types mirror the JSON the site posts, with every field
//! optional so that missing values surface as field errors instead of
//! deserialization failures. The `*Submission` types only exist after
//! validation succeeded.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Contact form payload as received
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// Quote request payload as received
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub plan: Option<String>,
    pub message: Option<String>,
}

/// Validated contact submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Validated quote request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub plan: String,
    pub message: Option<String>,
}

/// A single failed validation rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending field as it appears in the JSON body
    pub field: String,
    /// Message suitable for showing next to the form field
    pub message: String,
}

impl FieldError {
    pub fn new<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every rule a submission failed, in field order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: &str) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether any rule failed for `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}
