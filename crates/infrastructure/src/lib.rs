//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod console_mail_transport;
mod csv_report_writer;
mod file_audit_sink;
mod postgres_account_source;
mod smtp_mail_transport;
mod tera_template_renderer;

pub use console_mail_transport::ConsoleMailTransport;
pub use csv_report_writer::CsvReportWriter;
pub use file_audit_sink::FileAuditSink;
pub use postgres_account_source::PostgresAccountSource;
pub use smtp_mail_transport::SmtpMailTransport;
pub use tera_template_renderer::TeraTemplateRenderer;
