//! Closed-account records as returned by the retrieval query.

use chrono::NaiveDate;

/// Exception note attached to an account, suspending notification while active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldNote {
    /// Note class code; only `8FDI` notes suspend notification.
    pub class_code: String,
    /// Date the note stops applying. A missing date means the note never took effect.
    pub inactive_date: Option<NaiveDate>,
}

/// One closed account fetched from the data source.
///
/// The email address is carried raw and unvalidated; validation happens at
/// delivery time so a malformed address becomes a per-record outcome instead
/// of a fatal error.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountRecord {
    /// Account identifier at the data source.
    pub account_number: String,
    /// Member display name used in the rendered notice.
    pub member_name: String,
    /// Recipient address on file, when one exists.
    pub email_address: Option<String>,
    /// Date the account was closed.
    pub close_date: NaiveDate,
    /// Closure reason code the account matched.
    pub minor_code: String,
    /// Remaining balance; a missing value is treated as settled.
    pub balance: Option<f64>,
    /// Exception note, when the account carries one.
    pub hold_note: Option<HoldNote>,
}
