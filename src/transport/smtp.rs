//! SMTP transport using lettre.
//!
//! A blocking [`lettre::SmtpTransport`] is built for every delivery from the
//! [`Session`]; nothing is pooled between calls.

use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport as _};

use super::{Session, TlsPolicy, Transport, TransportError};

/// Port where TLS starts immediately instead of via STARTTLS.
pub const SMTPS_PORT: u16 = 465;

/// Production transport: authenticated SMTP over TLS.
///
/// - Port 465 uses implicit TLS; any other port upgrades with STARTTLS.
/// - [`TlsPolicy::Verified`] requires STARTTLS and checks the certificate
///   against the configured host.
/// - [`TlsPolicy::Relaxed`] accepts any certificate and falls back to plain
///   text when the server does not offer STARTTLS.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpRelay;

impl SmtpRelay {
    pub fn new() -> Self {
        Self
    }

    fn build_transport(&self, session: &Session) -> Result<SmtpTransport, TransportError> {
        let mut params = TlsParameters::builder(session.host.clone());
        if session.tls == TlsPolicy::Relaxed {
            params = params.dangerous_accept_invalid_certs(true);
        }
        let params = params.build()?;

        let tls = if session.port == SMTPS_PORT {
            Tls::Wrapper(params)
        } else {
            match session.tls {
                TlsPolicy::Verified => Tls::Required(params),
                TlsPolicy::Relaxed => Tls::Opportunistic(params),
            }
        };

        let mut builder = SmtpTransport::builder_dangerous(session.host.as_str())
            .port(session.port)
            .tls(tls)
            .credentials(Credentials::new(
                session.username.clone(),
                session.password.clone(),
            ));

        // `timeout(None)` disables lettre's default deadline; only override it.
        if let Some(timeout) = session.timeout {
            builder = builder.timeout(Some(timeout));
        }

        Ok(builder.build())
    }
}

impl Transport for SmtpRelay {
    fn deliver(&self, session: &Session, message: &Message) -> Result<(), TransportError> {
        let transport = self.build_transport(session)?;
        let response = transport.send(message)?;

        tracing::debug!(
            host = %session.host,
            port = session.port,
            code = %response.code(),
            "SMTP server accepted message"
        );

        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}
