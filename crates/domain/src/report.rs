//! Run-level reporting: CSV extract columns, status tallies, audit report.

use std::str::FromStr;

use chrono::NaiveDate;

use closura_core::{AppError, AppResult, RunId};

use crate::account::AccountRecord;
use crate::outcome::{OutcomeRecord, OutcomeStatus};

/// Columns the CSV extract may carry, in the closed header vocabulary.
///
/// Config headers are matched case-insensitively; `EMAILDATE` and `RESULT`
/// are accepted as legacy spellings of the close date and status columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvColumn {
    /// Account identifier.
    AccountNumber,
    /// Member display name.
    MemberName,
    /// Recipient address on file.
    EmailAddress,
    /// Account close date, formatted `mm-dd-yyyy`.
    CloseDate,
    /// Closure reason code.
    MinorCode,
    /// Outcome status storage value.
    Status,
    /// Outcome reason text.
    Reason,
}

impl CsvColumn {
    /// Returns the canonical header name written to the extract.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountNumber => "ACCTNBR",
            Self::MemberName => "MEMBERNAME",
            Self::EmailAddress => "EMAILADDR",
            Self::CloseDate => "CLOSEDATE",
            Self::MinorCode => "MINORCD",
            Self::Status => "STATUS",
            Self::Reason => "REASON",
        }
    }

    /// Parses a configured header name into a column.
    pub fn from_config_name(value: &str) -> AppResult<Self> {
        Self::from_str(value)
    }

    /// Returns the cell value for one processed record.
    #[must_use]
    pub fn extract(&self, record: &AccountRecord, outcome: &OutcomeRecord) -> String {
        match self {
            Self::AccountNumber => record.account_number.clone(),
            Self::MemberName => record.member_name.clone(),
            Self::EmailAddress => record.email_address.clone().unwrap_or_default(),
            Self::CloseDate => record.close_date.format("%m-%d-%Y").to_string(),
            Self::MinorCode => record.minor_code.clone(),
            Self::Status => outcome.status.as_str().to_owned(),
            Self::Reason => outcome.reason.clone(),
        }
    }
}

impl FromStr for CsvColumn {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_uppercase().as_str() {
            "ACCTNBR" => Ok(Self::AccountNumber),
            "MEMBERNAME" => Ok(Self::MemberName),
            "EMAILADDR" => Ok(Self::EmailAddress),
            "CLOSEDATE" | "EMAILDATE" => Ok(Self::CloseDate),
            "MINORCD" => Ok(Self::MinorCode),
            "STATUS" | "RESULT" => Ok(Self::Status),
            "REASON" => Ok(Self::Reason),
            other => Err(AppError::Config(format!(
                "unknown CSV header column '{other}'"
            ))),
        }
    }
}

/// Tally of outcomes by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    /// Notices handed to the transport.
    pub sent: usize,
    /// Records withheld by eligibility rules.
    pub skipped_ineligible: usize,
    /// Records with a missing or malformed address.
    pub skipped_invalid_email: usize,
    /// Records suppressed by configuration or environment.
    pub skipped_disabled: usize,
    /// Records the transport failed to deliver.
    pub failed_delivery: usize,
}

impl StatusCounts {
    /// Tallies a slice of outcomes.
    #[must_use]
    pub fn tally(outcomes: &[OutcomeRecord]) -> Self {
        let mut counts = Self::default();
        for outcome in outcomes {
            match outcome.status {
                OutcomeStatus::Sent => counts.sent += 1,
                OutcomeStatus::SkippedIneligible => counts.skipped_ineligible += 1,
                OutcomeStatus::SkippedInvalidEmail => counts.skipped_invalid_email += 1,
                OutcomeStatus::SkippedDisabled => counts.skipped_disabled += 1,
                OutcomeStatus::FailedDelivery => counts.failed_delivery += 1,
            }
        }
        counts
    }

    /// Total records processed.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.sent
            + self.skipped_ineligible
            + self.skipped_invalid_email
            + self.skipped_disabled
            + self.failed_delivery
    }

    /// Notices that went out or were only withheld by the delivery switch.
    #[must_use]
    pub fn would_have_sent(&self) -> usize {
        self.sent + self.skipped_disabled
    }
}

/// Immutable summary of one finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditReport {
    /// Identifier of the run that produced this report.
    pub run_id: RunId,
    /// Effective date the run covered.
    pub effective_date: NaiveDate,
    /// Outcome tallies.
    pub counts: StatusCounts,
    /// Every outcome in input order.
    pub outcomes: Vec<OutcomeRecord>,
}

impl AuditReport {
    /// Builds a report from the recorded outcomes.
    #[must_use]
    pub fn new(run_id: RunId, effective_date: NaiveDate, outcomes: Vec<OutcomeRecord>) -> Self {
        let counts = StatusCounts::tally(&outcomes);
        Self {
            run_id,
            effective_date,
            counts,
            outcomes,
        }
    }
}
