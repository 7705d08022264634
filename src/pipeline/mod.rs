//! One triage run over an already-selected folder:
//! list, then for each message fetch, parse, classify and record, then send
//! the report and optionally delete everything that was listed.

use crate::classify::Classifier;
use crate::domain::email::{ClassificationRecord, EmailId};
use crate::error::Result;
use crate::mail::imap_client::Mailbox;
use crate::mail::parser::parse_email;
use crate::report::{Report, ReportSender};
use crate::store::repo::ResultRecorder;

pub struct RunOptions {
    pub delete_processed: bool,
    pub recipients: Vec<String>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub spam: usize,
    pub not_spam: usize,
    pub unknown: usize,
    pub deleted: usize,
    /// UIDs whose `\Deleted` flag could not be set.
    pub failed_deletions: Vec<EmailId>,
}

/// Run the batch and close the mailbox, whatever the outcome.
pub fn run_pipeline(
    mailbox: &mut dyn Mailbox,
    classifier: &dyn Classifier,
    recorder: &dyn ResultRecorder,
    notifier: &dyn ReportSender,
    opts: &RunOptions,
) -> Result<RunSummary> {
    let outcome = run_batch(mailbox, classifier, recorder, notifier, opts);
    if let Err(e) = mailbox.close() {
        log::warn!("closing mailbox failed: {e}");
    }
    outcome
}

fn run_batch(
    mailbox: &mut dyn Mailbox,
    classifier: &dyn Classifier,
    recorder: &dyn ResultRecorder,
    notifier: &dyn ReportSender,
    opts: &RunOptions,
) -> Result<RunSummary> {
    let ids = mailbox.list_all()?;
    println!("Found {} spam emails", ids.len());

    let mut report = Report::default();
    for &id in &ids {
        let raw = mailbox.fetch_raw(id)?;
        let email = parse_email(id, &raw);

        println!("Analyzing email {id}...");
        let answer = classifier.classify(&email.body)?;
        let record = ClassificationRecord::new(&email, &answer);
        recorder.append_record(&record)?;
        println!("Result:\n{}{}", answer, Report::separator());

        report.push(&email, &record);
    }

    notifier.send_report(&report.subject_line(), &report.body(), &opts.recipients)?;

    let (spam, not_spam, unknown) = report.counts();
    let mut summary = RunSummary {
        processed: report.len(),
        spam,
        not_spam,
        unknown,
        ..Default::default()
    };

    if opts.delete_processed {
        for &id in &ids {
            match mailbox.mark_deleted(id) {
                Ok(()) => summary.deleted += 1,
                Err(e) => {
                    log::warn!("could not flag UID {id} for deletion: {e}");
                    summary.failed_deletions.push(id);
                }
            }
        }
        mailbox.expunge()?;
    }

    log::info!(
        "run finished: {} processed ({} spam, {} not spam, {} unknown), {} deleted",
        summary.processed,
        summary.spam,
        summary.not_spam,
        summary.unknown,
        summary.deleted
    );
    Ok(summary)
}
