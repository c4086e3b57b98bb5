//! Per-record processing outcomes.

use chrono::{DateTime, Utc};

/// Terminal status assigned to every fetched record exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeStatus {
    /// The notice was handed to the transport successfully.
    Sent,
    /// The account did not qualify for notification.
    SkippedIneligible,
    /// The recipient address was missing or failed validation.
    SkippedInvalidEmail,
    /// Delivery was suppressed by configuration or environment.
    SkippedDisabled,
    /// The transport rejected or failed the dispatch.
    FailedDelivery,
}

impl OutcomeStatus {
    /// Returns the stable value written to the CSV extract and audit report.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::SkippedIneligible => "skipped-ineligible",
            Self::SkippedInvalidEmail => "skipped-invalid-email",
            Self::SkippedDisabled => "skipped-disabled",
            Self::FailedDelivery => "failed-delivery",
        }
    }

    /// Returns whether the notice would have gone out with delivery enabled.
    #[must_use]
    pub fn counts_as_would_have_sent(&self) -> bool {
        matches!(self, Self::Sent | Self::SkippedDisabled)
    }
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Audit entry produced for one processed record.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeRecord {
    /// Account the outcome belongs to.
    pub account_number: String,
    /// Member display name, carried for the audit listing.
    pub member_name: String,
    /// Recipient the run actually used, when one was resolved.
    pub recipient: Option<String>,
    /// Terminal status.
    pub status: OutcomeStatus,
    /// Human-readable explanation of the status.
    pub reason: String,
    /// When the outcome was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl OutcomeRecord {
    /// Creates an outcome stamped with the current time.
    #[must_use]
    pub fn new(
        account_number: impl Into<String>,
        member_name: impl Into<String>,
        recipient: Option<String>,
        status: OutcomeStatus,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            account_number: account_number.into(),
            member_name: member_name.into(),
            recipient,
            status,
            reason: reason.into(),
            recorded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OutcomeStatus;

    #[test]
    fn statuses_have_stable_storage_values() {
        assert_eq!(OutcomeStatus::Sent.as_str(), "sent");
        assert_eq!(
            OutcomeStatus::SkippedIneligible.as_str(),
            "skipped-ineligible"
        );
        assert_eq!(
            OutcomeStatus::SkippedInvalidEmail.as_str(),
            "skipped-invalid-email"
        );
        assert_eq!(OutcomeStatus::SkippedDisabled.as_str(), "skipped-disabled");
        assert_eq!(OutcomeStatus::FailedDelivery.as_str(), "failed-delivery");
    }

    #[test]
    fn suppressed_sends_still_count_toward_reach() {
        assert!(OutcomeStatus::Sent.counts_as_would_have_sent());
        assert!(OutcomeStatus::SkippedDisabled.counts_as_would_have_sent());
        assert!(!OutcomeStatus::FailedDelivery.counts_as_would_have_sent());
        assert!(!OutcomeStatus::SkippedIneligible.counts_as_would_have_sent());
    }
}
