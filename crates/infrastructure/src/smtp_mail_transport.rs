//! SMTP mail transport using the `lettre` crate.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use closura_application::{MailTransport, OutboundEmail, SmtpParams};
use closura_core::{AppError, AppResult};

/// Production mail transport speaking SMTP with STARTTLS.
///
/// The underlying transport is built once per run and reused for every
/// message in the batch.
#[derive(Clone)]
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailTransport {
    /// Creates a transport from the run's SMTP parameters.
    pub fn new(params: &SmtpParams) -> AppResult<Self> {
        let credentials = Credentials::new(params.username.clone(), params.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&params.host)
            .map_err(|error| {
                AppError::Delivery(format!("failed to create SMTP transport: {error}"))
            })?
            .port(params.port)
            .credentials(credentials)
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, email: &OutboundEmail) -> AppResult<()> {
        let from = email
            .from
            .parse()
            .map_err(|error| AppError::Delivery(format!("invalid from address: {error}")))?;

        let to_mailbox = email
            .to
            .as_str()
            .parse()
            .map_err(|error| AppError::Delivery(format!("invalid recipient address: {error}")))?;

        let message = Message::builder()
            .from(from)
            .to(to_mailbox)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())
            .map_err(|error| AppError::Delivery(format!("failed to build email: {error}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|error| AppError::Delivery(format!("failed to send email: {error}")))?;

        Ok(())
    }
}
