//! Shared handler state

use crate::{
    error::{AppError, Result},
    logging::Logger,
    mail::{MailTransport, SmtpMailer},
    models::{Config, PlanCatalog},
    relay::LeadRelay,
};
use std::sync::Arc;

/// Immutable state cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub logger: Logger,
    pub plans: Arc<PlanCatalog>,
    relay: Option<Arc<LeadRelay>>,
}

impl AppState {
    /// State backed by the SMTP relay. Without complete mail credentials the
    /// relay stays disabled and submissions answer with a configuration error.
    pub fn new(config: Arc<Config>, logger: Logger) -> Result<Self> {
        let relay = match config.mail.credentials() {
            Ok(credentials) => {
                let transport: Arc<dyn MailTransport> = Arc::new(SmtpMailer::new(&credentials)?);
                Some(Arc::new(LeadRelay::new(transport, &credentials)))
            }
            Err(_) => None,
        };

        Ok(Self {
            config,
            logger,
            plans: Arc::new(PlanCatalog::current()),
            relay,
        })
    }

    /// State using the given transport instead of SMTP
    pub fn with_transport(config: Arc<Config>, transport: Arc<dyn MailTransport>, logger: Logger) -> Self {
        let relay = config
            .mail
            .credentials()
            .ok()
            .map(|credentials| Arc::new(LeadRelay::new(transport, &credentials)));

        Self {
            config,
            logger,
            plans: Arc::new(PlanCatalog::current()),
            relay,
        }
    }

    pub fn relay_enabled(&self) -> bool {
        self.relay.is_some()
    }

    /// The relay, or the configuration error explaining why there is none
    pub fn relay(&self) -> Result<Arc<LeadRelay>> {
        match &self.relay {
            Some(relay) => Ok(relay.clone()),
            None => match self.config.mail.credentials() {
                Err(e) => Err(e),
                Ok(_) => Err(AppError::config("Mail relay is not initialized")),
            },
        }
    }
}
