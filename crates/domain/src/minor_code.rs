//! Closure reason codes used to scope the retrieval query.

use std::fmt::{Display, Formatter};

use closura_core::{AppError, AppResult};

/// Non-empty, normalized set of closure minor codes.
///
/// Codes are uppercased and deduplicated while keeping their first-seen order,
/// so the bound query parameter is stable across runs with the same input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinorCodeSet(Vec<String>);

impl MinorCodeSet {
    /// Parses a comma-separated code list such as `NACL,NAIL,UAOE`.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let mut codes: Vec<String> = Vec::new();

        for part in raw.split(',') {
            let code = part.trim().to_uppercase();
            if code.is_empty() {
                continue;
            }
            if !codes.contains(&code) {
                codes.push(code);
            }
        }

        if codes.is_empty() {
            return Err(AppError::Config(
                "minor code list must contain at least one code".to_owned(),
            ));
        }

        Ok(Self(codes))
    }

    /// Returns the normalized codes in first-seen order.
    #[must_use]
    pub fn codes(&self) -> &[String] {
        self.0.as_slice()
    }
}

impl Display for MinorCodeSet {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0.join(","))
    }
}
