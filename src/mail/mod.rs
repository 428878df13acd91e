//! Outbound mail abstraction
//!
//! The relay only needs a "send this message" capability. [`SmtpMailer`]
//! provides it over SMTP; [`MemoryTransport`] records messages instead of
//! sending them and can be told to fail.

pub mod smtp;

pub use smtp::SmtpMailer;

use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// A fully rendered message ready for the transport
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingMessage {
    /// Display name of the sender
    pub from_name: String,
    /// Sender mailbox (the mail account identity)
    pub from_address: String,
    /// Single recipient
    pub to: String,
    pub subject: String,
    /// Plain-text alternative, when the template has one
    pub text: Option<String>,
    pub html: String,
}

/// Capability to deliver one message
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &OutgoingMessage) -> Result<()>;
}

/// Transport that keeps every message in memory
#[derive(Debug, Default)]
pub struct MemoryTransport {
    sent: Mutex<Vec<OutgoingMessage>>,
    fail: AtomicBool,
    fail_after: Mutex<Option<usize>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport whose every send fails
    pub fn failing() -> Self {
        let transport = Self::default();
        transport.fail.store(true, Ordering::SeqCst);
        transport
    }

    /// Transport that accepts `count` messages and fails afterwards
    pub fn failing_after(count: usize) -> Self {
        let transport = Self::default();
        if let Ok(mut limit) = transport.fail_after.lock() {
            *limit = Some(count);
        }
        transport
    }

    /// Snapshot of the messages accepted so far
    pub fn sent(&self) -> Vec<OutgoingMessage> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().map(|sent| sent.len()).unwrap_or(0)
    }
}

#[async_trait]
impl MailTransport for MemoryTransport {
    async fn send(&self, message: &OutgoingMessage) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::mail("memory transport configured to fail"));
        }

        let limit = self
            .fail_after
            .lock()
            .map_err(|_| AppError::internal("memory transport lock poisoned"))?
            .to_owned();

        let mut sent = self
            .sent
            .lock()
            .map_err(|_| AppError::internal("memory transport lock poisoned"))?;

        if let Some(limit) = limit {
            if sent.len() >= limit {
                return Err(AppError::mail(format!("memory transport refuses message {}", sent.len() + 1)));
            }
        }

        sent.push(message.clone());
        Ok(())
    }
}
