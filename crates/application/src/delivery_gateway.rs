//! Recipient resolution, address validation, suppression, and dispatch.

use std::sync::Arc;

use tracing::{debug, warn};

use closura_domain::{AccountRecord, ComposedMessage, EmailAddress, OutcomeRecord, OutcomeStatus};

use crate::notification_ports::{MailTransport, OutboundEmail};
use crate::run_config::RunConfig;

/// Send-or-suppress decision inputs, fixed for the whole run.
#[derive(Debug, Clone)]
pub struct DeliveryPolicy {
    /// Sender address stamped on every message.
    pub from_address: EmailAddress,
    /// Display name for the sender mailbox, when configured.
    pub from_name: Option<String>,
    /// Redirect recipient for test runs.
    pub test_override: Option<EmailAddress>,
    /// Whether dispatch is enabled at all.
    pub send_enabled: bool,
    /// Whether the process runs in the production batch environment.
    pub production: bool,
}

impl DeliveryPolicy {
    /// Builds the policy from a resolved run configuration.
    #[must_use]
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            from_address: config.from_address.clone(),
            from_name: config.from_name.clone(),
            test_override: config.test_address.clone(),
            send_enabled: config.send_enabled,
            production: config.production,
        }
    }

    /// Sender mailbox as it appears on outgoing mail, `Name <address>` when a
    /// display name is configured.
    fn from_mailbox(&self) -> String {
        match &self.from_name {
            Some(name) => format!("{name} <{}>", self.from_address),
            None => self.from_address.as_str().to_owned(),
        }
    }

    /// Returns the reason dispatch is suppressed, if it is.
    ///
    /// A test override is allowed to dispatch from a non-production
    /// environment; redirecting traffic to a test inbox is its purpose.
    fn suppression_reason(&self) -> Option<&'static str> {
        if !self.send_enabled {
            return Some("email sending is disabled for this run");
        }
        if !self.production && self.test_override.is_none() {
            return Some("non-production environment without a test override");
        }
        None
    }
}

/// Dispatches composed messages and turns every attempt into an outcome.
///
/// Per-record problems (missing, malformed, or rejected addresses, transport
/// failures) never escape as errors; each becomes an [`OutcomeRecord`] and the
/// run continues.
#[derive(Clone)]
pub struct DeliveryGateway {
    transport: Arc<dyn MailTransport>,
    policy: DeliveryPolicy,
}

impl DeliveryGateway {
    /// Creates a gateway over the given transport.
    #[must_use]
    pub fn new(transport: Arc<dyn MailTransport>, policy: DeliveryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Delivers one composed message, resolving the effective recipient first.
    ///
    /// Resolution order: test override beats the nominal address, validation
    /// beats the delivery switch, and only a validated recipient with
    /// delivery enabled reaches the transport.
    pub async fn deliver(
        &self,
        record: &AccountRecord,
        message: &ComposedMessage,
    ) -> OutcomeRecord {
        let nominal = match &self.policy.test_override {
            Some(address) => Some(address.as_str().to_owned()),
            None => message.nominal_recipient.clone(),
        };

        let Some(raw_recipient) = nominal.filter(|value| !value.trim().is_empty()) else {
            debug!(
                account_number = %record.account_number,
                "skipping account without an email address on file"
            );
            return self.outcome(
                record,
                None,
                OutcomeStatus::SkippedInvalidEmail,
                "account has no email address on file".to_owned(),
            );
        };

        let recipient = match EmailAddress::new(raw_recipient.as_str()) {
            Ok(address) => address,
            Err(error) => {
                debug!(
                    account_number = %record.account_number,
                    error = %error,
                    "skipping account with a malformed email address"
                );
                return self.outcome(
                    record,
                    Some(raw_recipient),
                    OutcomeStatus::SkippedInvalidEmail,
                    error.to_string(),
                );
            }
        };

        if let Some(reason) = self.policy.suppression_reason() {
            debug!(
                account_number = %record.account_number,
                reason,
                "suppressing delivery"
            );
            return self.outcome(
                record,
                Some(recipient.as_str().to_owned()),
                OutcomeStatus::SkippedDisabled,
                reason.to_owned(),
            );
        }

        let email = OutboundEmail {
            from: self.policy.from_mailbox(),
            to: recipient.clone(),
            subject: message.subject.clone(),
            html_body: message.html_body.clone(),
        };

        match self.transport.send(&email).await {
            Ok(()) => self.outcome(
                record,
                Some(recipient.as_str().to_owned()),
                OutcomeStatus::Sent,
                "notice delivered to transport".to_owned(),
            ),
            Err(error) => {
                warn!(
                    account_number = %record.account_number,
                    error = %error,
                    "delivery failed"
                );
                self.outcome(
                    record,
                    Some(recipient.as_str().to_owned()),
                    OutcomeStatus::FailedDelivery,
                    error.to_string(),
                )
            }
        }
    }

    fn outcome(
        &self,
        record: &AccountRecord,
        recipient: Option<String>,
        status: OutcomeStatus,
        reason: String,
    ) -> OutcomeRecord {
        OutcomeRecord::new(
            record.account_number.clone(),
            record.member_name.clone(),
            recipient,
            status,
            reason,
        )
    }
}
