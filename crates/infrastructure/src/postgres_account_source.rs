//! PostgreSQL-backed account source running the configured retrieval query.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};

use closura_application::AccountSource;
use closura_core::{AppError, AppResult};
use closura_domain::{AccountRecord, HoldNote, MinorCodeSet};

/// PostgreSQL-backed implementation of [`AccountSource`].
///
/// The query text comes from the run configuration and must select the
/// columns `acctnbr`, `membername`, `emailaddr`, `closedate`, `minorcd`,
/// `balance`, `hold_note_class`, and `hold_note_inactive`, binding the
/// effective date as `$1` and the minor codes as a text array `$2`.
/// Parameters are always bound, never spliced into the query text.
#[derive(Clone)]
pub struct PostgresAccountSource {
    pool: PgPool,
}

impl PostgresAccountSource {
    /// Creates an account source with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ClosedAccountRow {
    acctnbr: String,
    membername: String,
    emailaddr: Option<String>,
    closedate: NaiveDate,
    minorcd: String,
    balance: Option<f64>,
    hold_note_class: Option<String>,
    hold_note_inactive: Option<NaiveDate>,
}

impl ClosedAccountRow {
    fn into_record(self) -> AccountRecord {
        let hold_note = self.hold_note_class.map(|class_code| HoldNote {
            class_code,
            inactive_date: self.hold_note_inactive,
        });

        AccountRecord {
            account_number: self.acctnbr,
            member_name: self.membername,
            email_address: self.emailaddr,
            close_date: self.closedate,
            minor_code: self.minorcd,
            balance: self.balance,
            hold_note,
        }
    }
}

#[async_trait]
impl AccountSource for PostgresAccountSource {
    async fn fetch_closed(
        &self,
        query: &str,
        effective_date: NaiveDate,
        minor_codes: &MinorCodeSet,
    ) -> AppResult<Vec<AccountRecord>> {
        let codes: Vec<String> = minor_codes.codes().to_vec();
        let rows = sqlx::query_as::<_, ClosedAccountRow>(query)
            .bind(effective_date)
            .bind(&codes)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::DataSource(format!("failed to fetch closed accounts: {error}"))
            })?;

        Ok(rows.into_iter().map(ClosedAccountRow::into_record).collect())
    }
}
