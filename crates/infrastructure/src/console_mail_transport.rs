//! Console mail transport for local runs. Logs messages to tracing output.

use async_trait::async_trait;
use tracing::info;

use closura_application::{MailTransport, OutboundEmail};
use closura_core::AppResult;

/// Development transport that logs messages instead of dispatching them.
#[derive(Clone)]
pub struct ConsoleMailTransport;

impl ConsoleMailTransport {
    /// Creates a new console transport.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleMailTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailTransport for ConsoleMailTransport {
    async fn send(&self, email: &OutboundEmail) -> AppResult<()> {
        info!(
            to = %email.to,
            subject = %email.subject,
            "--- EMAIL (console) ---\nFrom: {}\nTo: {}\nSubject: {}\n\n{}\n--- END EMAIL ---",
            email.from,
            email.to,
            email.subject,
            email.html_body
        );

        Ok(())
    }
}
