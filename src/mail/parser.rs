use mailparse::{DispositionType, MailHeaderMap, ParsedMail};

use crate::domain::email::{EmailId, NO_BODY, NO_SUBJECT, ParsedEmail};

/// Best-effort split of a raw RFC 822 message into subject and plain-text body.
///
/// Never fails: missing pieces are replaced by the `NO_SUBJECT` / `NO_BODY`
/// placeholders.
pub fn parse(raw_rfc822: &[u8]) -> (String, String) {
    let parsed = match mailparse::parse_mail(raw_rfc822) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("unparseable message ({e}); using placeholders");
            return (NO_SUBJECT.to_string(), NO_BODY.to_string());
        }
    };

    let subject = parsed
        .headers
        .get_first_value("Subject")
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| NO_SUBJECT.to_string());

    let body = if is_multipart(&parsed) {
        first_plain_part(&parsed)
    } else {
        decode_text(&parsed)
    }
    .unwrap_or_else(|| NO_BODY.to_string());

    (subject, body)
}

pub fn parse_email(id: EmailId, raw_rfc822: &[u8]) -> ParsedEmail {
    let (subject, body) = parse(raw_rfc822);
    ParsedEmail { id, subject, body }
}

fn is_multipart(p: &ParsedMail) -> bool {
    p.ctype.mimetype.to_ascii_lowercase().starts_with("multipart/")
}

fn is_attachment(p: &ParsedMail) -> bool {
    matches!(
        p.get_content_disposition().disposition,
        DispositionType::Attachment
    )
}

/// Depth-first, in stored order; the first non-empty inline text/plain part wins.
///
/// Inline `message/rfc822` parts are descended into like multiparts.
fn first_plain_part(p: &ParsedMail) -> Option<String> {
    let mime = p.ctype.mimetype.to_ascii_lowercase();
    if mime == "text/plain" && !is_attachment(p) {
        if let Some(text) = decode_text(p) {
            return Some(text);
        }
    }

    if mime == "message/rfc822" && !is_attachment(p) {
        if let Some(text) = first_plain_in_embedded(p) {
            return Some(text);
        }
    }

    p.subparts.iter().find_map(first_plain_part)
}

fn first_plain_in_embedded(p: &ParsedMail) -> Option<String> {
    let raw = p.get_body_raw().ok()?;
    let inner = mailparse::parse_mail(&raw).ok()?;
    first_plain_part(&inner)
}

/// Decode a part's payload, replacing bytes that do not decode.
fn decode_text(p: &ParsedMail) -> Option<String> {
    let text = match p.get_body() {
        Ok(t) => t,
        Err(_) => {
            let raw = p.get_body_raw().ok()?;
            String::from_utf8_lossy(&raw).into_owned()
        }
    };
    if text.is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MULTIPART: &[u8] = b"From: a@example.com\r\n\
Subject: Win a prize\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/mixed; boundary=\"outer\"\r\n\
\r\n\
--outer\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
Content-Disposition: attachment; filename=\"notes.txt\"\r\n\
\r\n\
attached notes\r\n\
--outer\r\n\
Content-Type: multipart/alternative; boundary=\"inner\"\r\n\
\r\n\
--inner\r\n\
Content-Type: text/html; charset=utf-8\r\n\
\r\n\
<p>html body</p>\r\n\
--inner\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
plain body\r\n\
--inner--\r\n\
--outer\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
second plain body\r\n\
--outer--\r\n";

    #[test]
    fn picks_first_inline_plain_part() {
        let (subject, body) = parse(MULTIPART);
        assert_eq!(subject, "Win a prize");
        assert_eq!(body.trim(), "plain body");
    }

    #[test]
    fn descends_into_forwarded_message() {
        let raw = b"Subject: Fwd: invoice\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/mixed; boundary=\"outer\"\r\n\
\r\n\
--outer\r\n\
Content-Type: text/html; charset=utf-8\r\n\
\r\n\
<p>see below</p>\r\n\
--outer\r\n\
Content-Type: message/rfc822\r\n\
\r\n\
Subject: invoice\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
inner plain\r\n\
--outer--\r\n";
        let (subject, body) = parse(raw);
        assert_eq!(subject, "Fwd: invoice");
        assert_eq!(body.trim(), "inner plain");
    }

    #[test]
    fn attached_message_is_skipped() {
        let raw = b"Subject: bounce\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/mixed; boundary=\"outer\"\r\n\
\r\n\
--outer\r\n\
Content-Type: message/rfc822\r\n\
Content-Disposition: attachment; filename=\"orig.eml\"\r\n\
\r\n\
Subject: orig\r\n\
\r\n\
attached plain\r\n\
--outer--\r\n";
        assert_eq!(parse(raw).1, NO_BODY);
    }

    #[test]
    fn subject_value_is_kept_as_decoded() {
        let raw = b"Subject:   padded  \r\n\r\nbody\r\n";
        let expected = mailparse::parse_mail(raw)
            .unwrap()
            .headers
            .get_first_value("Subject")
            .unwrap();
        let (subject, _) = parse(raw);
        assert_eq!(subject, expected);
        assert!(subject.contains("padded"));
    }

    #[test]
    fn parsing_is_idempotent() {
        assert_eq!(parse(MULTIPART), parse(MULTIPART));
    }

    #[test]
    fn placeholders_when_nothing_readable() {
        let raw = b"From: a@example.com\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/alternative; boundary=\"b\"\r\n\
\r\n\
--b\r\n\
Content-Type: text/html; charset=utf-8\r\n\
\r\n\
<p>only html</p>\r\n\
--b--\r\n";
        let (subject, body) = parse(raw);
        assert_eq!(subject, NO_SUBJECT);
        assert_eq!(body, NO_BODY);
    }

    #[test]
    fn blank_subject_and_empty_body_use_placeholders() {
        let raw = b"From: a@example.com\r\nSubject:   \r\n\r\n";
        let (subject, body) = parse(raw);
        assert_eq!(subject, NO_SUBJECT);
        assert_eq!(body, NO_BODY);
    }

    #[test]
    fn single_part_is_decoded_whatever_its_type() {
        let raw = b"Subject: =?UTF-8?B?Q2Fmw6k=?=\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
Content-Transfer-Encoding: base64\r\n\
\r\n\
SGVsbG8gd29ybGQ=\r\n";
        let (subject, body) = parse(raw);
        assert_eq!(subject, "Café");
        assert_eq!(body.trim(), "Hello world");

        let html = b"Subject: promo\r\nContent-Type: text/html\r\n\r\n<b>deal</b>\r\n";
        assert_eq!(parse(html).1.trim(), "<b>deal</b>");
    }

    #[test]
    fn undecodable_bytes_are_replaced() {
        let raw = b"Subject: bytes\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
Content-Transfer-Encoding: 8bit\r\n\
\r\n\
caf\xff au lait\r\n";
        let (_, body) = parse(raw);
        assert!(body.starts_with("caf"));
        assert!(body.contains('\u{FFFD}'));
        assert!(body.contains("au lait"));
    }

    #[test]
    fn parse_email_carries_uid() {
        let email = parse_email(42, b"Subject: hi\r\n\r\nbody\r\n");
        assert_eq!(email.id, 42);
        assert_eq!(email.subject, "hi");
        assert_eq!(email.body.trim(), "body");
    }
}
