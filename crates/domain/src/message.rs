//! Rendered notice ready for recipient resolution and dispatch.

/// One composed closure notice.
///
/// Carries the record's nominal address untouched; the delivery gateway owns
/// recipient resolution so a test override can redirect every message without
/// losing which account it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage {
    /// Account the notice was composed for.
    pub account_number: String,
    /// Recipient address on file, still unvalidated.
    pub nominal_recipient: Option<String>,
    /// Subject line.
    pub subject: String,
    /// Rendered HTML body.
    pub html_body: String,
}
