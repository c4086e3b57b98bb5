//! Append-only audit log for completed runs.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::PathBuf;

use chrono_tz::Tz;
use closura_application::AuditSink;
use closura_core::{AppError, AppResult};
use closura_domain::AuditReport;

/// Appends one human-readable block per run to the audit log file.
///
/// Blocks are never rewritten, so the log keeps a full history of every
/// run that reached finalization.
#[derive(Clone)]
pub struct FileAuditSink {
    path: PathBuf,
    timezone: Tz,
}

impl FileAuditSink {
    /// Creates a sink appending to the given path, timestamping in the
    /// given timezone.
    #[must_use]
    pub fn new(path: PathBuf, timezone: Tz) -> Self {
        Self { path, timezone }
    }

    fn render_block(&self, report: &AuditReport) -> String {
        let counts = &report.counts;
        let mut block = String::new();
        let _ = writeln!(
            block,
            "==== closed account notice run {} ====",
            report.run_id
        );
        let _ = writeln!(
            block,
            "run date:       {}",
            chrono::Utc::now()
                .with_timezone(&self.timezone)
                .format("%m/%d/%Y %H:%M:%S")
        );
        let _ = writeln!(
            block,
            "effective date: {}",
            report.effective_date.format("%m/%d/%Y")
        );
        let _ = writeln!(
            block,
            "counts:         processed={} sent={} skipped-ineligible={} \
             skipped-invalid-email={} skipped-disabled={} failed-delivery={} \
             would-have-sent={}",
            counts.processed(),
            counts.sent,
            counts.skipped_ineligible,
            counts.skipped_invalid_email,
            counts.skipped_disabled,
            counts.failed_delivery,
            counts.would_have_sent()
        );
        for outcome in &report.outcomes {
            let _ = writeln!(
                block,
                "  {} | {} | {} | {} | {} | {}",
                outcome.account_number,
                outcome.member_name,
                outcome.recipient.as_deref().unwrap_or("-"),
                outcome.status,
                outcome.reason,
                outcome
                    .recorded_at
                    .with_timezone(&self.timezone)
                    .format("%m/%d/%Y %H:%M:%S")
            );
        }
        let _ = writeln!(block, "==== end of run {} ====", report.run_id);
        block.push('\n');
        block
    }
}

impl AuditSink for FileAuditSink {
    fn write_report(&self, report: &AuditReport) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                AppError::Report(format!(
                    "failed to create audit directory {}: {error}",
                    parent.display()
                ))
            })?;
        }

        let block = self.render_block(report);
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|error| {
                AppError::Report(format!(
                    "failed to open audit log {}: {error}",
                    self.path.display()
                ))
            })?;
        file.write_all(block.as_bytes())
            .map_err(|error| AppError::Report(format!("failed to append audit block: {error}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use chrono::NaiveDate;
    use closura_application::AuditSink;
    use closura_core::RunId;
    use closura_domain::{AuditReport, OutcomeRecord, OutcomeStatus};

    use super::FileAuditSink;

    fn audit_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "closura-audit-{}-{name}.audit.log",
            std::process::id()
        ))
    }

    fn effective_date() -> NaiveDate {
        let Some(date) = NaiveDate::from_ymd_opt(2026, 7, 31) else {
            panic!("date literal must parse");
        };
        date
    }

    fn sample_report(run_id: RunId) -> AuditReport {
        let outcomes = vec![
            OutcomeRecord::new(
                "1001",
                "Avery Member",
                Some("avery@example.com".to_owned()),
                OutcomeStatus::Sent,
                "notice delivered to transport",
            ),
            OutcomeRecord::new(
                "1002",
                "Blake Member",
                None,
                OutcomeStatus::SkippedInvalidEmail,
                "account has no email address on file",
            ),
        ];
        AuditReport::new(run_id, effective_date(), outcomes)
    }

    fn read_and_remove(path: &Path) -> String {
        let contents = std::fs::read_to_string(path)
            .unwrap_or_else(|error| panic!("audit log must be readable: {error}"));
        let _ = std::fs::remove_file(path);
        contents
    }

    #[test]
    fn a_run_block_lists_counts_and_every_outcome() {
        let path = audit_path("block");
        let sink = FileAuditSink::new(path.clone(), chrono_tz::America::Los_Angeles);
        let run_id = RunId::new();

        let result = sink.write_report(&sample_report(run_id));
        assert!(result.is_ok());

        let contents = read_and_remove(&path);
        assert!(contents.contains(&format!("closed account notice run {run_id}")));
        assert!(contents.contains("effective date: 07/31/2026"));
        assert!(contents.contains(
            "processed=2 sent=1 skipped-ineligible=0 skipped-invalid-email=1 \
             skipped-disabled=0 failed-delivery=0 would-have-sent=1"
        ));
        assert!(contents.contains("1001 | Avery Member | avery@example.com | sent"));
        assert!(contents.contains("1002 | Blake Member | - | skipped-invalid-email"));
        assert!(contents.contains(&format!("end of run {run_id}")));
    }

    #[test]
    fn consecutive_runs_append_without_rewriting() {
        let path = audit_path("append");
        let sink = FileAuditSink::new(path.clone(), chrono_tz::America::Los_Angeles);
        let first = RunId::new();
        let second = RunId::new();

        assert!(sink.write_report(&sample_report(first)).is_ok());
        assert!(sink.write_report(&sample_report(second)).is_ok());

        let contents = read_and_remove(&path);
        assert!(contents.contains(&format!("run {first}")));
        assert!(contents.contains(&format!("run {second}")));
        assert_eq!(contents.matches("==== end of run").count(), 2);
    }
}
