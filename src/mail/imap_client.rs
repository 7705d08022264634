use native_tls::{TlsConnector, TlsStream};
use std::net::TcpStream;

use crate::domain::email::EmailId;
use crate::error::{Error, Result};

type TlsSession = imap::Session<TlsStream<TcpStream>>;

/// The mailbox operations the triage run needs, on one selected folder.
pub trait Mailbox {
    /// Every UID in the folder, ascending.
    fn list_all(&mut self) -> Result<Vec<EmailId>>;
    fn fetch_raw(&mut self, id: EmailId) -> Result<Vec<u8>>;
    /// Sets `\Deleted`; nothing is removed until `expunge`.
    fn mark_deleted(&mut self, id: EmailId) -> Result<()>;
    fn expunge(&mut self) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}

/// Logged-in IMAP session over TLS with a folder selected.
///
/// Logs out on drop if `close` was never called.
pub struct ImapMailbox {
    pub server: String,
    pub user: String,
    session: Option<TlsSession>,
}

impl ImapMailbox {
    pub fn connect_and_select(
        server: &str,
        user: &str,
        password: &str,
        folder: &str,
    ) -> Result<Self> {
        log::info!("Connecting to {}:993", server);
        let conn_err = |reason: String| Error::Connection {
            host: server.to_string(),
            reason,
        };
        let tls = TlsConnector::builder()
            .build()
            .map_err(|e| conn_err(e.to_string()))?;
        let client =
            imap::connect((server, 993), server, &tls).map_err(|e| conn_err(e.to_string()))?;

        let session = client
            .login(user, password)
            .map_err(|(e, _client)| Error::Authentication {
                user: user.to_string(),
                reason: e.to_string(),
            })?;

        let mut mailbox = Self {
            server: server.to_string(),
            user: user.to_string(),
            session: Some(session),
        };

        let selected = mailbox
            .session()?
            .select(folder)
            .map_err(|e| Error::Mailbox(format!("SELECT {folder}: {e}")))?;
        log::info!("{} has {} messages", folder, selected.exists);
        Ok(mailbox)
    }

    fn session(&mut self) -> Result<&mut TlsSession> {
        self.session
            .as_mut()
            .ok_or_else(|| Error::Mailbox("session already closed".into()))
    }
}

impl Mailbox for ImapMailbox {
    fn list_all(&mut self) -> Result<Vec<EmailId>> {
        let mut uids: Vec<EmailId> = self
            .session()?
            .uid_search("ALL")
            .map_err(|e| Error::Mailbox(format!("UID SEARCH: {e}")))?
            .into_iter()
            .collect();
        uids.sort_unstable();
        Ok(uids)
    }

    fn fetch_raw(&mut self, id: EmailId) -> Result<Vec<u8>> {
        // PEEK keeps \Seen untouched
        let fetches = self
            .session()?
            .uid_fetch(id.to_string(), "(UID BODY.PEEK[])")
            .map_err(|e| Error::Fetch {
                id,
                reason: e.to_string(),
            })?;

        fetches
            .iter()
            .find_map(|f| f.body())
            .map(|b| b.to_vec())
            .ok_or_else(|| Error::Fetch {
                id,
                reason: "message not found (deleted concurrently?)".into(),
            })
    }

    fn mark_deleted(&mut self, id: EmailId) -> Result<()> {
        self.session()?
            .uid_store(id.to_string(), "+FLAGS (\\Deleted)")
            .map_err(|e| Error::Mailbox(format!("UID STORE {id}: {e}")))?;
        Ok(())
    }

    fn expunge(&mut self) -> Result<()> {
        self.session()?
            .expunge()
            .map_err(|e| Error::Mailbox(format!("EXPUNGE: {e}")))?;
        log::info!("expunged flagged messages on {}", self.server);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut session) = self.session.take() {
            session
                .logout()
                .map_err(|e| Error::Mailbox(format!("LOGOUT: {e}")))?;
            log::debug!("logged out of {}", self.server);
        }
        Ok(())
    }
}

impl Drop for ImapMailbox {
    fn drop(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.logout() {
                log::warn!("logout from {} on drop failed: {e}", self.server);
            }
        }
    }
}
