//! Validated send path.

use lettre::message::header::ContentType;
use lettre::Message;

use crate::address::Address;
use crate::config::{MailConfig, Mode};
use crate::error::SendError;
use crate::recipients::Recipients;
use crate::transport::{Session, SmtpRelay, TlsPolicy, Transport};

/// Per-call overrides for [`send`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// Sender for this call. Takes priority over [`MailConfig::from`] and the
    /// account username. Ignored when its email is empty.
    pub from: Option<Address>,
}

impl SendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the sender.
    pub fn from(mut self, addr: impl Into<Address>) -> Self {
        self.from = Some(addr.into());
        self
    }
}

/// Send an HTML email over SMTP.
///
/// The config and recipients are validated first. In [`Mode::Debug`] nothing
/// is sent: the sender, recipients and subject are logged through `tracing`
/// and the call succeeds. [`Mode::Test`] and [`Mode::Live`] deliver through
/// [`SmtpRelay`]; see [`send_via`] to use another transport.
///
/// ```
/// use postbox::{send, MailConfig, Recipients, SendOptions};
///
/// let config = MailConfig::new("smtp.example.com", "user@example.com", "secret");
/// let recipients = Recipients::new().to("alice@example.com");
///
/// // Debug mode (the default) only logs.
/// send(&config, &recipients, "Hello", "<p>Hi!</p>", &SendOptions::default()).unwrap();
/// ```
pub fn send(
    config: &MailConfig,
    recipients: &Recipients,
    subject: &str,
    body: &str,
    options: &SendOptions,
) -> Result<(), SendError> {
    send_via(&SmtpRelay, config, recipients, subject, body, options)
}

/// Same as [`send`], delivering through `transport` in Test and Live modes.
pub fn send_via<T: Transport + ?Sized>(
    transport: &T,
    config: &MailConfig,
    recipients: &Recipients,
    subject: &str,
    body: &str,
    options: &SendOptions,
) -> Result<(), SendError> {
    config.validate()?;
    recipients.validate()?;

    let sender = resolve_sender(config, options);

    let tls = match config.mode {
        Mode::Debug => {
            log_debug_send(&sender, recipients, subject, body);
            return Ok(());
        }
        Mode::Test => TlsPolicy::Relaxed,
        Mode::Live => TlsPolicy::Verified,
    };

    let message = build_message(&sender, recipients, subject, body)?;
    let session = Session::from_config(config, tls);

    tracing::debug!(
        transport = transport.name(),
        mode = %config.mode,
        host = %session.host,
        port = session.port,
        "Delivering email"
    );

    transport
        .deliver(&session, &message)
        .map_err(|cause| SendError::DeliveryFailed { cause })?;

    tracing::info!(
        from = %sender,
        to = recipients.to.len(),
        cc = recipients.cc.len(),
        bcc = recipients.bcc.len(),
        subject = %subject,
        "Email sent"
    );

    Ok(())
}

/// Explicit override, then configured default, then the account username.
pub fn resolve_sender(config: &MailConfig, options: &SendOptions) -> Address {
    if let Some(from) = options.from.as_ref().filter(|a| !a.is_empty()) {
        return from.clone();
    }
    if let Some(from) = config.from.as_ref().filter(|a| !a.is_empty()) {
        return from.clone();
    }
    Address {
        name: None,
        email: config.username.clone(),
    }
}

/// Build the message handed to the transport.
///
/// Cc and Bcc are only set when their lists are non-empty. Lettre keeps Bcc
/// addresses in the envelope and drops the header from the formatted text.
pub fn build_message(
    sender: &Address,
    recipients: &Recipients,
    subject: &str,
    body: &str,
) -> Result<Message, SendError> {
    let mut builder = Message::builder()
        .from(sender.to_mailbox()?)
        .subject(subject);

    for to in &recipients.to {
        builder = builder.to(to.to_mailbox()?);
    }
    for cc in &recipients.cc {
        builder = builder.cc(cc.to_mailbox()?);
    }
    for bcc in &recipients.bcc {
        builder = builder.bcc(bcc.to_mailbox()?);
    }

    let message = builder
        .header(ContentType::TEXT_HTML)
        .body(body.to_string())?;

    Ok(message)
}

fn log_debug_send(sender: &Address, recipients: &Recipients, subject: &str, body: &str) {
    tracing::info!(
        from = %sender,
        to = ?recipients.to.iter().map(|a| a.formatted()).collect::<Vec<_>>(),
        cc = ?recipients.cc.iter().map(|a| a.formatted()).collect::<Vec<_>>(),
        bcc = ?recipients.bcc.iter().map(|a| a.formatted()).collect::<Vec<_>>(),
        subject = %subject,
        "Debug mode: email not sent"
    );
    tracing::debug!(body = %body, "HTML body");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;
    use tracing_test::traced_test;

    fn config() -> MailConfig {
        MailConfig::new("smtp.example.com", "test@example.com", "password")
            .port(587)
            .from("sender@example.com")
    }

    fn recipients() -> Recipients {
        Recipients::new()
            .to("recipient@example.com")
            .cc("cc@example.com")
            .bcc("bcc@example.com")
    }

    #[test]
    fn test_resolve_sender_priority() {
        let base = MailConfig::new("smtp.example.com", "user@example.com", "pass");

        let with_override = SendOptions::new().from("override@example.com");
        let with_default = base.clone().from("default@example.com");

        assert_eq!(
            resolve_sender(&with_default, &with_override).email,
            "override@example.com"
        );
        assert_eq!(
            resolve_sender(&with_default, &SendOptions::default()).email,
            "default@example.com"
        );
        assert_eq!(
            resolve_sender(&base, &SendOptions::default()).email,
            "user@example.com"
        );
    }

    #[test]
    fn test_resolve_sender_skips_empty_values() {
        let config = MailConfig::new("smtp.example.com", "user@example.com", "pass").from("");
        let options = SendOptions::new().from("");
        assert_eq!(resolve_sender(&config, &options).email, "user@example.com");
    }

    #[test]
    fn test_resolve_sender_keeps_whitespace_override() {
        let config = MailConfig::new("smtp.example.com", "user@example.com", "pass");
        let options = SendOptions::new().from(" ");
        assert_eq!(resolve_sender(&config, &options).email, " ");
    }

    #[test]
    fn test_build_message_headers() {
        let message = build_message(
            &Address::with_name("App", "sender@example.com"),
            &recipients(),
            "Subject line",
            "<p>Body</p>",
        )
        .unwrap();

        let headers = message.headers();
        assert_eq!(headers.get_raw("Subject"), Some("Subject line"));
        assert!(headers.get_raw("Cc").is_some());
        assert!(headers
            .get_raw("Content-Type")
            .is_some_and(|v| v.starts_with("text/html")));

        let envelope: Vec<String> = message.envelope().to().iter().map(|a| a.to_string()).collect();
        assert_eq!(envelope.len(), 3);
        for addr in ["recipient@example.com", "cc@example.com", "bcc@example.com"] {
            assert!(envelope.iter().any(|e| e == addr), "{addr} missing from envelope");
        }
    }

    #[test]
    fn test_build_message_omits_empty_cc_bcc() {
        let message = build_message(
            &Address::new("sender@example.com"),
            &Recipients::new().to("to@example.com"),
            "s",
            "b",
        )
        .unwrap();

        assert!(message.headers().get_raw("Cc").is_none());
        assert!(message.headers().get_raw("Bcc").is_none());
    }

    #[test]
    fn test_build_message_rejects_bad_address() {
        let result = build_message(
            &Address::new("not an address"),
            &Recipients::new().to("to@example.com"),
            "s",
            "b",
        );
        assert!(matches!(result, Err(SendError::InvalidAddress(_))));
    }

    #[test]
    #[traced_test]
    fn test_debug_mode_logs_and_skips_transport() {
        let transport = MemoryTransport::new();
        let result = send_via(
            &transport,
            &config(),
            &recipients(),
            "Debug subject",
            "<p>hi</p>",
            &SendOptions::default(),
        );

        assert!(result.is_ok());
        assert!(transport.is_empty());
        assert!(logs_contain("Debug mode: email not sent"));
        assert!(logs_contain("sender@example.com"));
        assert!(logs_contain("bcc@example.com"));
        assert!(logs_contain("Debug subject"));
    }

    #[test]
    fn test_debug_mode_does_not_parse_addresses() {
        let config = MailConfig::new("smtp.test", "dummy", "dummy");
        let recipients = Recipients::new().to("user@test.com");
        assert!(send_via(
            &MemoryTransport::new(),
            &config,
            &recipients,
            "s",
            "b",
            &SendOptions::default()
        )
        .is_ok());
    }

    #[test]
    fn test_config_checked_before_recipients() {
        let result = send_via(
            &MemoryTransport::new(),
            &MailConfig::default(),
            &Recipients::new(),
            "s",
            "b",
            &SendOptions::default(),
        );
        assert!(matches!(result, Err(SendError::ConfigInvalid { .. })));
    }
}
