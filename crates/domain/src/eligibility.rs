//! Pure eligibility rules applied to each fetched account.

use chrono::NaiveDate;

use crate::account::AccountRecord;

/// Note class whose active presence suspends notification.
const SUSPENDING_NOTE_CLASS: &str = "8FDI";

/// Reason an account was withheld from notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IneligibleReason {
    /// The account still carries a non-zero balance.
    OutstandingBalance,
    /// The account carries a suspending note that has not yet lapsed.
    ActiveHoldNote,
}

impl IneligibleReason {
    /// Returns the human-readable detail recorded on the outcome.
    #[must_use]
    pub fn detail(&self) -> &'static str {
        match self {
            Self::OutstandingBalance => "account has an outstanding balance",
            Self::ActiveHoldNote => "account carries an active hold note",
        }
    }
}

/// Result of assessing one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// The account qualifies for notification.
    Eligible,
    /// The account is withheld for the given reason.
    Ineligible(IneligibleReason),
}

/// Assesses whether an account qualifies for a closure notice.
///
/// Deterministic: the same record and run date always yield the same result.
/// Balance checks treat a missing balance as settled. A hold note suspends
/// notification only while its class is suspending and its inactive date has
/// not passed relative to `run_date`.
#[must_use]
pub fn assess(record: &AccountRecord, run_date: NaiveDate) -> Eligibility {
    if record.balance.unwrap_or(0.0) != 0.0 {
        return Eligibility::Ineligible(IneligibleReason::OutstandingBalance);
    }

    if let Some(note) = &record.hold_note {
        if note.class_code == SUSPENDING_NOTE_CLASS
            && note.inactive_date.is_some_and(|date| date >= run_date)
        {
            return Eligibility::Ineligible(IneligibleReason::ActiveHoldNote);
        }
    }

    Eligibility::Eligible
}

/// Convenience predicate over [`assess`].
#[must_use]
pub fn is_eligible(record: &AccountRecord, run_date: NaiveDate) -> bool {
    matches!(assess(record, run_date), Eligibility::Eligible)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{Eligibility, IneligibleReason, assess, is_eligible};
    use crate::account::{AccountRecord, HoldNote};

    fn run_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default()
    }

    fn settled_record() -> AccountRecord {
        AccountRecord {
            account_number: "100234".to_owned(),
            member_name: "Avery Member".to_owned(),
            email_address: Some("avery@example.com".to_owned()),
            close_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            minor_code: "NACL".to_owned(),
            balance: None,
            hold_note: None,
        }
    }

    #[test]
    fn settled_account_without_notes_is_eligible() {
        assert_eq!(assess(&settled_record(), run_date()), Eligibility::Eligible);
    }

    #[test]
    fn zero_balance_is_treated_as_settled() {
        let mut record = settled_record();
        record.balance = Some(0.0);
        assert!(is_eligible(&record, run_date()));
    }

    #[test]
    fn outstanding_balance_withholds_notification() {
        let mut record = settled_record();
        record.balance = Some(12.34);
        assert_eq!(
            assess(&record, run_date()),
            Eligibility::Ineligible(IneligibleReason::OutstandingBalance)
        );
    }

    #[test]
    fn negative_balance_also_withholds_notification() {
        let mut record = settled_record();
        record.balance = Some(-0.01);
        assert!(!is_eligible(&record, run_date()));
    }

    #[test]
    fn active_hold_note_withholds_notification() {
        let mut record = settled_record();
        record.hold_note = Some(HoldNote {
            class_code: "8FDI".to_owned(),
            inactive_date: NaiveDate::from_ymd_opt(2024, 2, 1),
        });
        assert_eq!(
            assess(&record, run_date()),
            Eligibility::Ineligible(IneligibleReason::ActiveHoldNote)
        );
    }

    #[test]
    fn lapsed_hold_note_is_ignored() {
        let mut record = settled_record();
        record.hold_note = Some(HoldNote {
            class_code: "8FDI".to_owned(),
            inactive_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        });
        assert!(is_eligible(&record, run_date()));
    }

    #[test]
    fn non_suspending_note_class_is_ignored() {
        let mut record = settled_record();
        record.hold_note = Some(HoldNote {
            class_code: "MEMO".to_owned(),
            inactive_date: NaiveDate::from_ymd_opt(2024, 2, 1),
        });
        assert!(is_eligible(&record, run_date()));
    }

    #[test]
    fn hold_note_without_inactive_date_is_ignored() {
        let mut record = settled_record();
        record.hold_note = Some(HoldNote {
            class_code: "8FDI".to_owned(),
            inactive_date: None,
        });
        assert!(is_eligible(&record, run_date()));
    }
}
