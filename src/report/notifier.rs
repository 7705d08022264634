use lettre::message::Mailbox as Address;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::error::{Error, Result};

pub trait ReportSender {
    fn send_report(&self, subject: &str, body: &str, recipients: &[String]) -> Result<()>;
}

/// Sends over an authenticated TLS SMTP relay, as the mailbox account.
pub struct SmtpNotifier {
    server: String,
    user: String,
    password: String,
}

impl SmtpNotifier {
    pub fn new(
        server: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            user: user.into(),
            password: password.into(),
        }
    }
}

pub fn build_message(
    from: &str,
    subject: &str,
    body: &str,
    recipients: &[String],
) -> Result<Message> {
    if recipients.is_empty() {
        return Err(Error::Delivery("no recipients".into()));
    }

    let from: Address = from
        .parse()
        .map_err(|e| Error::Delivery(format!("Invalid from address {from}: {e}")))?;
    let mut builder = Message::builder().from(from).subject(subject);
    for to in recipients {
        let addr: Address = to
            .parse()
            .map_err(|e| Error::Delivery(format!("Invalid to address {to}: {e}")))?;
        builder = builder.to(addr);
    }

    builder
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .map_err(|e| Error::Delivery(format!("Failed to build email: {e}")))
}

impl ReportSender for SmtpNotifier {
    fn send_report(&self, subject: &str, body: &str, recipients: &[String]) -> Result<()> {
        let email = build_message(&self.user, subject, body, recipients)?;

        let creds = Credentials::new(self.user.clone(), self.password.clone());
        let transport = SmtpTransport::relay(&self.server)
            .map_err(|e| Error::Delivery(format!("SMTP relay error: {e}")))?
            .credentials(creds)
            .build();

        transport
            .send(&email)
            .map_err(|e| Error::Delivery(format!("SMTP send failed: {e}")))?;

        log::info!("Report sent to {}", recipients.join(", "));
        Ok(())
    }
}
