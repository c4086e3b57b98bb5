//! Shared primitives for all Rust crates in Closura.

#![forbid(unsafe_code)]

use std::fmt::{Display, Formatter};

use thiserror::Error;
use uuid::Uuid;

/// Result type used across Closura crates.
pub type AppResult<T> = Result<T, AppError>;

/// Identifier assigned to a single notification run and stamped on its audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(Uuid);

impl RunId {
    /// Creates a random run identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a run identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RunId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed run configuration. Fatal before any account is fetched.
    #[error("config error: {0}")]
    Config(String),

    /// Account retrieval failed at the data source. Fatal before any delivery is attempted.
    #[error("data source error: {0}")]
    DataSource(String),

    /// Template could not be loaded or rendered. Fatal for the whole run.
    #[error("template error: {0}")]
    Template(String),

    /// Recipient address failed syntactic validation. Recorded per record.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Mail transport rejected or failed a dispatch. Recorded per record.
    #[error("delivery error: {0}")]
    Delivery(String),

    /// Audit report or CSV extract could not be written.
    #[error("report error: {0}")]
    Report(String),
}
