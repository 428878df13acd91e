//! Lead submission relay
//!
//! Validates contact and quote submissions, renders the operator
//! notification and the requester acknowledgment, and hands both to the
//! mail transport in that order. A submission only succeeds when both
//! messages were accepted. Nothing is retried and duplicate submissions
//! send duplicate mail.

pub mod templates;
pub mod validation;

pub use templates::{BusinessProfile, Envelope};
pub use validation::{is_valid_email, validate_contact, validate_quote};

use crate::{
    error::AppError,
    mail::{MailTransport, OutgoingMessage},
    models::{ContactForm, ContactSubmission, MailCredentials, QuoteForm, QuoteSubmission, ValidationErrors},
};
use std::sync::Arc;
use thiserror::Error;

/// Why a submission was not relayed
#[derive(Error, Debug)]
pub enum RelayError {
    /// The submission failed one or more field rules; nothing was sent
    #[error("Invalid submission: {0}")]
    Invalid(ValidationErrors),

    /// The transport rejected a message
    #[error("Delivery failed: {0}")]
    Delivery(#[from] AppError),
}

impl From<ValidationErrors> for RelayError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(errors)
    }
}

/// Relays validated submissions through a mail transport
pub struct LeadRelay {
    transport: Arc<dyn MailTransport>,
    sender: String,
    operator: String,
    business: BusinessProfile,
}

impl LeadRelay {
    /// Create a relay sending as the mail account identity to the operator mailbox
    pub fn new(transport: Arc<dyn MailTransport>, credentials: &MailCredentials) -> Self {
        Self {
            transport,
            sender: credentials.username.clone(),
            operator: credentials.admin_email.clone(),
            business: BusinessProfile::default(),
        }
    }

    /// Replace the business details printed in auto-replies
    pub fn with_business(mut self, business: BusinessProfile) -> Self {
        self.business = business;
        self
    }

    fn envelope(&self) -> Envelope<'_> {
        Envelope {
            sender: &self.sender,
            operator: &self.operator,
            business: &self.business,
        }
    }

    /// Validate and relay a contact form submission
    pub async fn submit_contact(&self, form: ContactForm) -> Result<ContactSubmission, RelayError> {
        let submission = validate_contact(form)?;

        let envelope = self.envelope();
        let notification = templates::contact_notification(&submission, &envelope);
        let acknowledgment = templates::contact_acknowledgment(&submission, &envelope);
        self.deliver(&notification, &acknowledgment).await?;

        Ok(submission)
    }

    /// Validate and relay a quote request
    pub async fn submit_quote(&self, form: QuoteForm) -> Result<QuoteSubmission, RelayError> {
        let submission = validate_quote(form)?;

        let envelope = self.envelope();
        let notification = templates::quote_notification(&submission, &envelope);
        let acknowledgment = templates::quote_acknowledgment(&submission, &envelope);
        self.deliver(&notification, &acknowledgment).await?;

        Ok(submission)
    }

    // Operator first; the acknowledgment is not attempted if that fails.
    async fn deliver(&self, notification: &OutgoingMessage, acknowledgment: &OutgoingMessage) -> Result<(), AppError> {
        self.transport.send(notification).await?;
        self.transport.send(acknowledgment).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::MemoryTransport;

    fn credentials() -> MailCredentials {
        MailCredentials {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: "relay@thillaicable.com".to_string(),
            password: "secret".to_string(),
            admin_email: "admin@thillaicable.com".to_string(),
        }
    }

    fn contact_form(name: &str, email: &str, message: &str) -> ContactForm {
        ContactForm {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            message: Some(message.to_string()),
        }
    }

    #[tokio::test]
    async fn test_contact_sends_exactly_two_messages() {
        let transport = Arc::new(MemoryTransport::new());
        let relay = LeadRelay::new(transport.clone(), &credentials());

        relay.submit_contact(contact_form("A", "a@b.com", "hi")).await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "admin@thillaicable.com");
        assert_eq!(sent[1].to, "a@b.com");
    }

    #[tokio::test]
    async fn test_invalid_contact_sends_nothing() {
        let transport = Arc::new(MemoryTransport::new());
        let relay = LeadRelay::new(transport.clone(), &credentials());

        let result = relay.submit_contact(contact_form("A", "not-an-email", "hi")).await;
        match result {
            Err(RelayError::Invalid(errors)) => assert!(errors.has_field("email")),
            other => panic!("expected validation failure, got {:?}", other),
        }
        assert_eq!(transport.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_is_delivery_error() {
        let relay = LeadRelay::new(Arc::new(MemoryTransport::failing()), &credentials());

        let result = relay.submit_contact(contact_form("A", "a@b.com", "hi")).await;
        assert!(matches!(result, Err(RelayError::Delivery(AppError::Mail(_)))));
    }

    #[tokio::test]
    async fn test_acknowledgment_failure_fails_submission() {
        let transport = Arc::new(MemoryTransport::failing_after(1));
        let relay = LeadRelay::new(transport.clone(), &credentials());

        let result = relay.submit_contact(contact_form("A", "a@b.com", "hi")).await;
        assert!(matches!(result, Err(RelayError::Delivery(_))));
        assert_eq!(transport.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_quote_sends_notification_then_acknowledgment() {
        let transport = Arc::new(MemoryTransport::new());
        let relay = LeadRelay::new(transport.clone(), &credentials());

        let form = QuoteForm {
            name: Some("Arun".to_string()),
            email: Some("arun@example.com".to_string()),
            plan: Some("business".to_string()),
            ..QuoteForm::default()
        };
        let submission = relay.submit_quote(form).await.unwrap();
        assert_eq!(submission.plan, "business");

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].subject, "New Quote Request - business Plan");
        assert_eq!(sent[1].to, "arun@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_submissions_send_duplicate_mail() {
        let transport = Arc::new(MemoryTransport::new());
        let relay = LeadRelay::new(transport.clone(), &credentials());

        relay.submit_contact(contact_form("A", "a@b.com", "hi")).await.unwrap();
        relay.submit_contact(contact_form("A", "a@b.com", "hi")).await.unwrap();
        assert_eq!(transport.sent_count(), 4);
    }

    #[tokio::test]
    async fn test_custom_business_profile() {
        let transport = Arc::new(MemoryTransport::new());
        let business = BusinessProfile {
            name: "Thillai Fibre".to_string(),
            ..BusinessProfile::default()
        };
        let relay = LeadRelay::new(transport.clone(), &credentials()).with_business(business);

        relay.submit_contact(contact_form("A", "a@b.com", "hi")).await.unwrap();
        assert_eq!(transport.sent()[1].subject, "Thank You for Contacting Thillai Fibre");
    }
}
