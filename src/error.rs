use crate::domain::email::EmailId;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of a triage run, tagged by the phase that raised them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not connect to {host}: {reason}")]
    Connection { host: String, reason: String },

    #[error("Login as {user} rejected: {reason}")]
    Authentication { user: String, reason: String },

    #[error("Mailbox command failed: {0}")]
    Mailbox(String),

    #[error("Fetching UID {id} failed: {reason}")]
    Fetch { id: EmailId, reason: String },

    #[error("Provider {provider} failed: {reason}")]
    Classification { provider: String, reason: String },

    #[error("Writing {path} failed: {reason}")]
    Record { path: String, reason: String },

    #[error("Report delivery failed: {0}")]
    Delivery(String),
}

impl Error {
    pub fn phase(&self) -> &'static str {
        match self {
            Error::Config(_) => "configuration",
            Error::Connection { .. } | Error::Authentication { .. } => "connect",
            Error::Mailbox(_) => "mailbox",
            Error::Fetch { .. } => "fetch",
            Error::Classification { .. } => "classify",
            Error::Record { .. } => "record",
            Error::Delivery(_) => "send report",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_name_the_failed_step() {
        let e = Error::Fetch {
            id: 7,
            reason: "no such message".into(),
        };
        assert_eq!(e.phase(), "fetch");
        assert_eq!(e.to_string(), "Fetching UID 7 failed: no such message");

        let e = Error::Authentication {
            user: "me@example.com".into(),
            reason: "bad credentials".into(),
        };
        assert_eq!(e.phase(), "connect");
        assert_eq!(Error::Delivery("x".into()).phase(), "send report");
    }
}
