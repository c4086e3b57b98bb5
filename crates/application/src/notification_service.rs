//! Orchestrates one closed-account notification run end to end.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use closura_core::{AppResult, RunId};
use closura_domain::{
    AccountRecord, AuditReport, Eligibility, OutcomeRecord, OutcomeStatus, eligibility,
};

use crate::audit_recorder::AuditRecorder;
use crate::delivery_gateway::DeliveryGateway;
use crate::message_composer::MessageComposer;
use crate::notification_ports::{AccountSource, AuditSink, ReportWriter};
use crate::run_config::RunConfig;


/// Reason recorded when a nominal address already reached delivery this run.
const DUPLICATE_REASON: &str = "duplicate recipient address already notified in this run";

/// One-shot pipeline: fetch, assess, compose, deliver, record, finalize.
#[derive(Clone)]
pub struct NotificationService {
    account_source: Arc<dyn AccountSource>,
    composer: MessageComposer,
    gateway: DeliveryGateway,
    report_writer: Arc<dyn ReportWriter>,
    audit_sink: Arc<dyn AuditSink>,
}

impl NotificationService {
    /// Creates a notification service.
    #[must_use]
    pub fn new(
        account_source: Arc<dyn AccountSource>,
        composer: MessageComposer,
        gateway: DeliveryGateway,
        report_writer: Arc<dyn ReportWriter>,
        audit_sink: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            account_source,
            composer,
            gateway,
            report_writer,
            audit_sink,
        }
    }

    /// Runs the pipeline for the configured effective date.
    ///
    /// Config, data source, and template errors abort the run before any
    /// output file exists. Per-record problems become outcomes; the run
    /// finishes, writes its outputs, and reports them.
    pub async fn run(&self, config: &RunConfig) -> AppResult<AuditReport> {
        let run_id = RunId::new();
        info!(
            run_id = %run_id,
            effective_date = %config.effective_date,
            minor_codes = %config.minor_codes,
            send_enabled = config.send_enabled,
            production = config.production,
            "closed-account notification run started"
        );

        let records = self
            .account_source
            .fetch_closed(
                config.query.as_str(),
                config.effective_date,
                &config.minor_codes,
            )
            .await?;
        info!(count = records.len(), "fetched closed accounts");

        let run_date = Utc::now().with_timezone(&config.timezone).date_naive();
        let mut recorder = AuditRecorder::new(
            run_id,
            config.effective_date,
            config.csv_header.clone(),
            self.report_writer.clone(),
            self.audit_sink.clone(),
        );
        let mut notified: HashSet<String> = HashSet::new();

        for record in &records {
            let outcome = self.process_record(record, run_date, &mut notified).await?;
            recorder.record(record, outcome);
        }

        let report = recorder.finalize()?;
        info!(
            run_id = %report.run_id,
            processed = report.counts.processed(),
            sent = report.counts.sent,
            skipped_ineligible = report.counts.skipped_ineligible,
            skipped_invalid_email = report.counts.skipped_invalid_email,
            skipped_disabled = report.counts.skipped_disabled,
            failed_delivery = report.counts.failed_delivery,
            would_have_sent = report.counts.would_have_sent(),
            "closed-account notification run finished"
        );
        Ok(report)
    }

    /// Assigns one record its terminal outcome.
    ///
    /// Only template failures escalate; everything else the record can get
    /// wrong is captured in the outcome itself.
    async fn process_record(
        &self,
        record: &AccountRecord,
        run_date: NaiveDate,
        notified: &mut HashSet<String>,
    ) -> AppResult<OutcomeRecord> {
        if let Some(address) = normalized_address(record) {
            if notified.contains(&address) {
                return Ok(OutcomeRecord::new(
                    record.account_number.clone(),
                    record.member_name.clone(),
                    record.email_address.clone(),
                    OutcomeStatus::SkippedIneligible,
                    DUPLICATE_REASON,
                ));
            }
        }

        if let Eligibility::Ineligible(reason) = eligibility::assess(record, run_date) {
            return Ok(OutcomeRecord::new(
                record.account_number.clone(),
                record.member_name.clone(),
                record.email_address.clone(),
                OutcomeStatus::SkippedIneligible,
                reason.detail(),
            ));
        }

        let message = self.composer.compose(record)?;
        let outcome = self.gateway.deliver(record, &message).await;

        // Records that reached delivery mark their address, whatever the
        // transport said; a second record for the same inbox is a duplicate.
        if matches!(
            outcome.status,
            OutcomeStatus::Sent | OutcomeStatus::SkippedDisabled | OutcomeStatus::FailedDelivery
        ) {
            if let Some(address) = normalized_address(record) {
                notified.insert(address);
            }
        }

        Ok(outcome)
    }
}

/// Lowercased, trimmed nominal address used for duplicate suppression.
fn normalized_address(record: &AccountRecord) -> Option<String> {
    record
        .email_address
        .as_deref()
        .map(|value| value.trim().to_lowercase())
        .filter(|value| !value.is_empty())
}
