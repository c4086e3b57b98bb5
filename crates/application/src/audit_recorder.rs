//! Accumulates per-record outcomes and writes the run's outputs exactly once.

use std::sync::Arc;

use chrono::NaiveDate;

use closura_core::{AppResult, RunId};
use closura_domain::{AccountRecord, AuditReport, CsvColumn, OutcomeRecord};

use crate::notification_ports::{AuditSink, ReportWriter};

/// Collects outcomes in processing order and finalizes them into the CSV
/// extract and the audit report.
///
/// `finalize` consumes the recorder, so a run cannot write its outputs twice.
pub struct AuditRecorder {
    run_id: RunId,
    effective_date: NaiveDate,
    header: Vec<CsvColumn>,
    outcomes: Vec<OutcomeRecord>,
    rows: Vec<Vec<String>>,
    report_writer: Arc<dyn ReportWriter>,
    audit_sink: Arc<dyn AuditSink>,
}

impl AuditRecorder {
    /// Creates an empty recorder for one run.
    #[must_use]
    pub fn new(
        run_id: RunId,
        effective_date: NaiveDate,
        header: Vec<CsvColumn>,
        report_writer: Arc<dyn ReportWriter>,
        audit_sink: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            run_id,
            effective_date,
            header,
            outcomes: Vec::new(),
            rows: Vec::new(),
            report_writer,
            audit_sink,
        }
    }

    /// Records one processed record and its outcome.
    pub fn record(&mut self, record: &AccountRecord, outcome: OutcomeRecord) {
        let row = self
            .header
            .iter()
            .map(|column| column.extract(record, &outcome))
            .collect();
        self.rows.push(row);
        self.outcomes.push(outcome);
    }

    /// Number of outcomes recorded so far.
    #[must_use]
    pub fn recorded(&self) -> usize {
        self.outcomes.len()
    }

    /// Writes the CSV extract and audit report, returning the report.
    ///
    /// Nothing is written before this point; a run that aborts mid-flight
    /// leaves no partial output files behind.
    pub fn finalize(self) -> AppResult<AuditReport> {
        let report = AuditReport::new(self.run_id, self.effective_date, self.outcomes);
        self.report_writer.write_extract(&self.header, &self.rows)?;
        self.audit_sink.write_report(&report)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;

    use closura_core::{AppError, AppResult, RunId};
    use closura_domain::{
        AccountRecord, AuditReport, CsvColumn, OutcomeRecord, OutcomeStatus,
    };

    use super::AuditRecorder;
    use crate::notification_ports::{AuditSink, ReportWriter};

    #[derive(Default)]
    struct RecordingReportWriter {
        extracts: Mutex<Vec<(Vec<CsvColumn>, Vec<Vec<String>>)>>,
    }

    impl ReportWriter for RecordingReportWriter {
        fn write_extract(&self, header: &[CsvColumn], rows: &[Vec<String>]) -> AppResult<()> {
            self.extracts
                .lock()
                .map_err(|error| {
                    AppError::Report(format!("failed to lock writer state: {error}"))
                })?
                .push((header.to_vec(), rows.to_vec()));
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingAuditSink {
        reports: Mutex<Vec<AuditReport>>,
    }

    impl AuditSink for RecordingAuditSink {
        fn write_report(&self, report: &AuditReport) -> AppResult<()> {
            self.reports
                .lock()
                .map_err(|error| AppError::Report(format!("failed to lock sink state: {error}")))?
                .push(report.clone());
            Ok(())
        }
    }

    fn record(account_number: &str) -> AccountRecord {
        AccountRecord {
            account_number: account_number.to_owned(),
            member_name: "Avery Member".to_owned(),
            email_address: Some("avery@example.com".to_owned()),
            close_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap_or_default(),
            minor_code: "NACL".to_owned(),
            balance: None,
            hold_note: None,
        }
    }

    fn outcome(account_number: &str, status: OutcomeStatus) -> OutcomeRecord {
        OutcomeRecord::new(account_number, "Avery Member", None, status, "test")
    }

    #[test]
    fn finalize_writes_extract_and_report_once() {
        let writer = Arc::new(RecordingReportWriter::default());
        let sink = Arc::new(RecordingAuditSink::default());
        let header = vec![CsvColumn::AccountNumber, CsvColumn::Status];
        let effective_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();

        let mut recorder = AuditRecorder::new(
            RunId::new(),
            effective_date,
            header,
            writer.clone(),
            sink.clone(),
        );
        recorder.record(&record("1001"), outcome("1001", OutcomeStatus::Sent));
        recorder.record(
            &record("1002"),
            outcome("1002", OutcomeStatus::SkippedIneligible),
        );
        assert_eq!(recorder.recorded(), 2);

        let Ok(report) = recorder.finalize() else {
            panic!("finalize must succeed");
        };
        assert_eq!(report.counts.sent, 1);
        assert_eq!(report.counts.skipped_ineligible, 1);

        let Ok(extracts) = writer.extracts.lock() else {
            panic!("writer state must be readable");
        };
        assert_eq!(extracts.len(), 1);
        assert_eq!(extracts[0].1.len(), 2);
        assert_eq!(extracts[0].1[0], vec!["1001".to_owned(), "sent".to_owned()]);

        let Ok(reports) = sink.reports.lock() else {
            panic!("sink state must be readable");
        };
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].outcomes.len(), 2);
    }

    #[test]
    fn nothing_is_written_before_finalize() {
        let writer = Arc::new(RecordingReportWriter::default());
        let sink = Arc::new(RecordingAuditSink::default());
        let effective_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();

        let mut recorder = AuditRecorder::new(
            RunId::new(),
            effective_date,
            vec![CsvColumn::AccountNumber],
            writer.clone(),
            sink.clone(),
        );
        recorder.record(&record("1001"), outcome("1001", OutcomeStatus::Sent));

        let Ok(extracts) = writer.extracts.lock() else {
            panic!("writer state must be readable");
        };
        let Ok(reports) = sink.reports.lock() else {
            panic!("sink state must be readable");
        };
        assert!(extracts.is_empty());
        assert!(reports.is_empty());
    }

    #[test]
    fn rows_follow_the_configured_header_order() {
        let writer = Arc::new(RecordingReportWriter::default());
        let sink = Arc::new(RecordingAuditSink::default());
        let header = vec![
            CsvColumn::Status,
            CsvColumn::AccountNumber,
            CsvColumn::CloseDate,
        ];
        let effective_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();

        let mut recorder =
            AuditRecorder::new(RunId::new(), effective_date, header, writer.clone(), sink);
        recorder.record(&record("1001"), outcome("1001", OutcomeStatus::Sent));

        let Ok(report) = recorder.finalize() else {
            panic!("finalize must succeed");
        };
        assert_eq!(report.counts.processed(), 1);

        let Ok(extracts) = writer.extracts.lock() else {
            panic!("writer state must be readable");
        };
        assert_eq!(
            extracts[0].1[0],
            vec!["sent".to_owned(), "1001".to_owned(), "01-02-2024".to_owned()]
        );
    }
}
