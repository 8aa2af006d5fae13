//! In-memory transport that records deliveries.
//!
//! # Example
//!
//! ```
//! use postbox::transport::MemoryTransport;
//! use postbox::{send_via, MailConfig, Mode, Recipients, SendOptions};
//!
//! let transport = MemoryTransport::new();
//! let config = MailConfig::new("smtp.example.com", "user@example.com", "secret").mode(Mode::Live);
//! let recipients = Recipients::new().to("alice@example.com");
//!
//! send_via(&transport, &config, &recipients, "Hi", "<p>Hello</p>", &SendOptions::default()).unwrap();
//!
//! assert_eq!(transport.count(), 1);
//! assert_eq!(transport.last().unwrap().subject().as_deref(), Some("Hi"));
//! ```

use lettre::Message;
use parking_lot::Mutex;

use super::{Session, Transport, TransportError};

/// A message handed to a [`MemoryTransport`], with the session it would
/// have used.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub session: Session,
    pub message: Message,
}

impl Delivery {
    /// Envelope sender.
    pub fn from(&self) -> Option<String> {
        self.message.envelope().from().map(|a| a.to_string())
    }

    /// Every envelope recipient (to, cc and bcc).
    pub fn recipients(&self) -> Vec<String> {
        self.message
            .envelope()
            .to()
            .iter()
            .map(|a| a.to_string())
            .collect()
    }

    /// Raw value of a header, if present.
    pub fn header(&self, name: &str) -> Option<String> {
        self.message.headers().get_raw(name).map(|v| v.to_string())
    }

    pub fn subject(&self) -> Option<String> {
        self.header("Subject")
    }

    /// The full RFC 5322 text of the message.
    pub fn formatted(&self) -> String {
        String::from_utf8_lossy(&self.message.formatted()).into_owned()
    }
}

/// Transport that keeps every delivery in memory.
///
/// Optionally fails every delivery with a fixed message, for exercising
/// error paths.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    deliveries: Mutex<Vec<Delivery>>,
    failure: Option<String>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose every delivery fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            deliveries: Mutex::new(Vec::new()),
            failure: Some(reason.into()),
        }
    }

    /// All recorded deliveries, oldest first.
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().clone()
    }

    /// The most recent delivery.
    pub fn last(&self) -> Option<Delivery> {
        self.deliveries.lock().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.deliveries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Remove and return all recorded deliveries.
    pub fn flush(&self) -> Vec<Delivery> {
        std::mem::take(&mut *self.deliveries.lock())
    }
}

impl Transport for MemoryTransport {
    fn deliver(&self, session: &Session, message: &Message) -> Result<(), TransportError> {
        if let Some(reason) = &self.failure {
            return Err(reason.clone().into());
        }

        self.deliveries.lock().push(Delivery {
            session: session.clone(),
            message: message.clone(),
        });
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TlsPolicy;
    use lettre::message::header::ContentType;

    fn session() -> Session {
        Session {
            host: "smtp.example.com".into(),
            port: 587,
            username: "user".into(),
            password: "pass".into(),
            tls: TlsPolicy::Verified,
            timeout: None,
        }
    }

    fn message(subject: &str) -> Message {
        Message::builder()
            .from("sender@example.com".parse().unwrap())
            .to("to@example.com".parse().unwrap())
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body("<p>hi</p>".to_string())
            .unwrap()
    }

    #[test]
    fn test_records_in_order() {
        let transport = MemoryTransport::new();
        transport.deliver(&session(), &message("one")).unwrap();
        transport.deliver(&session(), &message("two")).unwrap();

        let subjects: Vec<_> = transport
            .deliveries()
            .iter()
            .filter_map(|d| d.subject())
            .collect();
        assert_eq!(subjects, vec!["one", "two"]);
        assert_eq!(transport.last().unwrap().subject().as_deref(), Some("two"));
    }

    #[test]
    fn test_flush_empties() {
        let transport = MemoryTransport::new();
        transport.deliver(&session(), &message("one")).unwrap();

        assert_eq!(transport.flush().len(), 1);
        assert!(transport.is_empty());
    }

    #[test]
    fn test_failing_records_nothing() {
        let transport = MemoryTransport::failing("connection refused");
        let err = transport.deliver(&session(), &message("one")).unwrap_err();

        assert_eq!(err.to_string(), "connection refused");
        assert!(transport.is_empty());
    }

    #[test]
    fn test_delivery_accessors() {
        let transport = MemoryTransport::new();
        transport.deliver(&session(), &message("hello")).unwrap();
        let delivery = transport.last().unwrap();

        assert_eq!(delivery.from().as_deref(), Some("sender@example.com"));
        assert_eq!(delivery.recipients(), vec!["to@example.com"]);
        assert!(delivery.formatted().contains("<p>hi</p>"));
        assert!(delivery.header("Cc").is_none());
    }
}
