//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod account;
mod email;
pub mod eligibility;
mod message;
mod minor_code;
mod outcome;
mod report;

pub use account::{AccountRecord, HoldNote};
pub use email::EmailAddress;
pub use eligibility::{Eligibility, IneligibleReason};
pub use message::ComposedMessage;
pub use minor_code::MinorCodeSet;
pub use outcome::{OutcomeRecord, OutcomeStatus};
pub use report::{AuditReport, CsvColumn, StatusCounts};
