pub mod notifier;

use crate::domain::email::{Classification, ClassificationRecord, ParsedEmail};
use crate::mail::decoders::normalize_snippet;

pub use notifier::{ReportSender, SmtpNotifier};

const PREVIEW_CHARS: usize = 140;

/// Per-message summaries in listing order, sent as one email at the end.
#[derive(Debug, Default)]
pub struct Report {
    sections: Vec<String>,
    spam: usize,
    not_spam: usize,
    unknown: usize,
}

impl Report {
    pub fn separator() -> String {
        format!("\n{}\n", "-".repeat(40))
    }

    pub fn push(&mut self, email: &ParsedEmail, record: &ClassificationRecord) {
        match record.classification {
            Classification::Spam => self.spam += 1,
            Classification::NotSpam => self.not_spam += 1,
            Classification::Unknown => self.unknown += 1,
        }
        self.sections.push(format!(
            "Email {}\nSubject: {}\nClassification: {}\nPreview: {}\nReason:\n{}",
            record.email_id,
            record.subject,
            record.classification,
            normalize_snippet(&email.body, PREVIEW_CHARS),
            record.reason,
        ));
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn counts(&self) -> (usize, usize, usize) {
        (self.spam, self.not_spam, self.unknown)
    }

    pub fn subject_line(&self) -> String {
        format!(
            "Spam report: {} emails ({} spam, {} not spam, {} unknown)",
            self.len(),
            self.spam,
            self.not_spam,
            self.unknown
        )
    }

    pub fn body(&self) -> String {
        self.sections.join(Self::separator().as_str())
    }
}
