use serde::{Deserialize, Serialize};

/// IMAP UID of a message in the selected folder.
pub type EmailId = u32;

pub const NO_SUBJECT: &str = "[No subject]";
pub const NO_BODY: &str = "[No readable plain text body found.]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEmail {
    pub id: EmailId,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    Spam,
    #[serde(rename = "Not Spam")]
    NotSpam,
    Unknown,
}

impl Classification {
    /// Derive the label from free-form model output.
    ///
    /// "not spam" is looked for first, so an answer that repeats the question
    /// ("Spam or Not Spam? ...") lands on `NotSpam`.
    pub fn from_response(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("not spam") {
            Classification::NotSpam
        } else if lower.contains("spam") {
            Classification::Spam
        } else {
            Classification::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Spam => "Spam",
            Classification::NotSpam => "Not Spam",
            Classification::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the results file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub email_id: String,
    pub subject: String,
    pub classification: Classification,
    pub reason: String,
}

impl ClassificationRecord {
    pub fn new(email: &ParsedEmail, response: &str) -> Self {
        Self {
            email_id: email.id.to_string(),
            subject: email.subject.clone(),
            classification: Classification::from_response(response),
            reason: response.to_string(),
        }
    }
}
