//! Mail sink boundary
//!
//! The capture pipeline hands finished alerts to an opaque sink and only
//! learns whether the message was accepted for delivery. There is no
//! delivery confirmation, no retry, and any timeout is the sink's own
//! responsibility. Hosts without a transport inject `NoopSink`.

use tracing::debug;

/// Body content type of an outgoing alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    PlainText,
    Html,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::PlainText => "text/plain",
            ContentType::Html => "text/html",
        }
    }
}

/// Outgoing alert transport
///
/// `send` returns true when the message was accepted for delivery. A single
/// blocking attempt; the capture pipeline never retries.
pub trait MailSink {
    fn send(&self, to: &str, subject: &str, body: &str, content_type: ContentType) -> bool;
}

/// Null-object sink for hosts with no mail transport configured.
/// Accepts nothing; the capture pipeline treats every send as failed and
/// leaves throttle state untouched.
pub struct NoopSink;

impl MailSink for NoopSink {
    fn send(&self, to: &str, subject: &str, _body: &str, _content_type: ContentType) -> bool {
        debug!("no mail transport configured, dropping alert to {} ({})", to, subject);
        false
    }
}

/// Minimal syntactic validity check for a recipient address.
/// Not RFC-complete; it only rejects values that cannot possibly be
/// addresses so the pipeline can skip the send silently.
pub fn is_valid_email(address: &str) -> bool {
    let address = address.trim();
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !address.contains(char::is_whitespace)
}
