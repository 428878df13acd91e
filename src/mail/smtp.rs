//! SMTP delivery through lettre

use super::{MailTransport, OutgoingMessage};
use crate::{
    error::{AppError, Result},
    models::MailCredentials,
};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

/// STARTTLS SMTP transport authenticated with the configured mail account
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build a transport for the relay host. No connection is opened until
    /// the first message is sent.
    pub fn new(credentials: &MailCredentials) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&credentials.smtp_host)
            .map_err(|e| AppError::config(format!("Invalid SMTP host '{}': {}", credentials.smtp_host, e)))?
            .port(credentials.smtp_port)
            .credentials(Credentials::new(
                credentials.username.clone(),
                credentials.password.clone(),
            ))
            .build();

        Ok(Self { transport })
    }

    /// Convert a rendered message into a MIME message
    pub fn build_message(message: &OutgoingMessage) -> Result<Message> {
        let from = Mailbox::new(Some(message.from_name.clone()), message.from_address.parse()?);
        let to = Mailbox::new(None, message.to.parse()?);

        let builder = Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.clone());

        let email = match &message.text {
            Some(text) => builder.multipart(MultiPart::alternative_plain_html(
                text.clone(),
                message.html.clone(),
            ))?,
            None => builder.singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_HTML)
                    .body(message.html.clone()),
            )?,
        };

        Ok(email)
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, message: &OutgoingMessage) -> Result<()> {
        let email = Self::build_message(message)?;
        self.transport.send(email).await?;
        Ok(())
    }
}
