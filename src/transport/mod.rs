//! Delivery transports.
//!
//! Dispatch builds a [`lettre::Message`] and a [`Session`] describing where
//! and how to connect, then hands both to a [`Transport`].
//!
//! ## Available Transports
//!
//! | Transport | Description |
//! |-----------|-------------|
//! | [`SmtpRelay`] | Blocking SMTP via lettre (used by [`send`](crate::send)) |
//! | [`MemoryTransport`] | Records messages in memory for tests and dry runs |

use lettre::Message;
use std::fmt;
use std::time::Duration;

use crate::config::MailConfig;

mod memory;
mod smtp;

pub use memory::{Delivery, MemoryTransport};
pub use smtp::{SmtpRelay, SMTPS_PORT};

/// Error type transports report. Dispatch keeps it as the error source.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// How strictly the server certificate is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsPolicy {
    /// Full certificate and hostname verification.
    Verified,
    /// Accept any certificate. Only for non-production servers.
    Relaxed,
}

/// Connection parameters for one delivery.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub tls: TlsPolicy,
    pub timeout: Option<Duration>,
}

impl Session {
    /// Build a session from a config that has already been validated.
    pub(crate) fn from_config(config: &MailConfig, tls: TlsPolicy) -> Self {
        Self {
            host: config.server.clone(),
            port: config.effective_port(),
            username: config.username.clone(),
            password: config.password.clone(),
            tls,
            timeout: config.timeout,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("tls", &self.tls)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Something that can deliver a built message.
///
/// Implement this to plug in a different delivery path; pass it to
/// [`send_via`](crate::send_via).
///
/// ```
/// use lettre::Message;
/// use postbox::transport::{Session, Transport, TransportError};
///
/// struct Discard;
///
/// impl Transport for Discard {
///     fn deliver(&self, _session: &Session, _message: &Message) -> Result<(), TransportError> {
///         Ok(())
///     }
/// }
/// ```
pub trait Transport {
    /// Open a session and transmit the message.
    fn deliver(&self, session: &Session, message: &Message) -> Result<(), TransportError>;

    /// Transport name for logging.
    fn name(&self) -> &'static str {
        "unknown"
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn deliver(&self, session: &Session, message: &Message) -> Result<(), TransportError> {
        (**self).deliver(session, message)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
