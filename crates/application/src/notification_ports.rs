//! Ports the notification pipeline depends on. Infrastructure provides the
//! Postgres, SMTP, Tera, and filesystem implementations.

use async_trait::async_trait;

use chrono::NaiveDate;
use closura_core::AppResult;
use closura_domain::{AccountRecord, AuditReport, CsvColumn, EmailAddress, MinorCodeSet};

/// Fully addressed message handed to the mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    /// Sender mailbox, `Name <address>` or a bare address.
    pub from: String,
    /// Validated recipient.
    pub to: EmailAddress,
    /// Subject line.
    pub subject: String,
    /// Rendered HTML body.
    pub html_body: String,
}

/// Values substituted into the notice template.
///
/// Key names are part of the template contract: `membername`, `emaildate`,
/// and `year`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContext<'a> {
    /// Member display name.
    pub member_name: &'a str,
    /// Account close date formatted `mm/dd/yyyy`.
    pub email_date: String,
    /// Current calendar year in the configured timezone.
    pub year: String,
}

/// Port for fetching closed accounts from the data source.
#[async_trait]
pub trait AccountSource: Send + Sync {
    /// Runs the configured retrieval query with the effective date bound as
    /// `$1` and the minor codes bound as a text array `$2`.
    async fn fetch_closed(
        &self,
        query: &str,
        effective_date: NaiveDate,
        minor_codes: &MinorCodeSet,
    ) -> AppResult<Vec<AccountRecord>>;
}

/// Port for dispatching a single message.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Sends one message; an error marks only that record as failed.
    async fn send(&self, email: &OutboundEmail) -> AppResult<()>;
}

/// Port for rendering the notice body.
pub trait TemplateRenderer: Send + Sync {
    /// Renders the configured template with per-record context.
    fn render(&self, context: &MessageContext<'_>) -> AppResult<String>;
}

/// Port for writing the CSV extract.
pub trait ReportWriter: Send + Sync {
    /// Writes the header row followed by one row per processed record,
    /// in processing order.
    fn write_extract(&self, header: &[CsvColumn], rows: &[Vec<String>]) -> AppResult<()>;
}

/// Port for persisting the human-readable audit report.
pub trait AuditSink: Send + Sync {
    /// Records the finished run.
    fn write_report(&self, report: &AuditReport) -> AppResult<()>;
}
