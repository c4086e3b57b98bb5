//! Builds one notice per eligible record from the configured template.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use chrono_tz::Tz;

use closura_core::AppResult;
use closura_domain::{AccountRecord, ComposedMessage};

use crate::notification_ports::{MessageContext, TemplateRenderer};

/// Composes the subject and rendered body for each record.
///
/// Composition never resolves the final recipient; it carries the record's
/// nominal address so the delivery gateway can apply the test override.
#[derive(Clone)]
pub struct MessageComposer {
    renderer: Arc<dyn TemplateRenderer>,
    subject: String,
    timezone: Tz,
}

impl MessageComposer {
    /// Creates a composer over the given renderer.
    #[must_use]
    pub fn new(renderer: Arc<dyn TemplateRenderer>, subject: String, timezone: Tz) -> Self {
        Self {
            renderer,
            subject,
            timezone,
        }
    }

    /// Renders the notice for one record.
    ///
    /// A render failure is escalated; a template that breaks for one record
    /// is broken for the run.
    pub fn compose(&self, record: &AccountRecord) -> AppResult<ComposedMessage> {
        let context = MessageContext {
            member_name: record.member_name.as_str(),
            email_date: record.close_date.format("%m/%d/%Y").to_string(),
            year: Utc::now().with_timezone(&self.timezone).year().to_string(),
        };
        let html_body = self.renderer.render(&context)?;

        Ok(ComposedMessage {
            account_number: record.account_number.clone(),
            nominal_recipient: record.email_address.clone(),
            subject: self.subject.clone(),
            html_body,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;

    use closura_core::{AppError, AppResult};
    use closura_domain::AccountRecord;

    use super::MessageComposer;
    use crate::notification_ports::{MessageContext, TemplateRenderer};

    #[derive(Default)]
    struct RecordingRenderer {
        contexts: Mutex<Vec<(String, String, String)>>,
    }

    impl TemplateRenderer for RecordingRenderer {
        fn render(&self, context: &MessageContext<'_>) -> AppResult<String> {
            self.contexts
                .lock()
                .map_err(|error| {
                    AppError::Template(format!("failed to lock renderer state: {error}"))
                })?
                .push((
                    context.member_name.to_owned(),
                    context.email_date.clone(),
                    context.year.clone(),
                ));
            Ok("<p>rendered</p>".to_owned())
        }
    }

    struct FailingRenderer;

    impl TemplateRenderer for FailingRenderer {
        fn render(&self, _context: &MessageContext<'_>) -> AppResult<String> {
            Err(AppError::Template("variable not found".to_owned()))
        }
    }

    fn record() -> AccountRecord {
        AccountRecord {
            account_number: "100234".to_owned(),
            member_name: "Avery Member".to_owned(),
            email_address: Some("avery@example.com".to_owned()),
            close_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap_or_default(),
            minor_code: "NACL".to_owned(),
            balance: None,
            hold_note: None,
        }
    }

    #[test]
    fn compose_fills_the_template_contract() {
        let renderer = Arc::new(RecordingRenderer::default());
        let composer = MessageComposer::new(
            renderer.clone(),
            "Your Closed Account".to_owned(),
            chrono_tz::America::Los_Angeles,
        );

        let Ok(message) = composer.compose(&record()) else {
            panic!("compose must succeed");
        };

        assert_eq!(message.account_number, "100234");
        assert_eq!(
            message.nominal_recipient.as_deref(),
            Some("avery@example.com")
        );
        assert_eq!(message.subject, "Your Closed Account");
        assert_eq!(message.html_body, "<p>rendered</p>");

        let Ok(contexts) = renderer.contexts.lock() else {
            panic!("renderer state must be readable");
        };
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].0, "Avery Member");
        assert_eq!(contexts[0].1, "01/02/2024");
        assert_eq!(contexts[0].2.len(), 4);
    }

    #[test]
    fn render_failure_escalates() {
        let composer = MessageComposer::new(
            Arc::new(FailingRenderer),
            "Your Closed Account".to_owned(),
            chrono_tz::America::Los_Angeles,
        );

        let Err(error) = composer.compose(&record()) else {
            panic!("render failure must escalate");
        };
        assert!(matches!(error, AppError::Template(_)));
    }
}
