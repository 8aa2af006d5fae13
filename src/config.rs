//! SMTP configuration and delivery mode.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::address::Address;
use crate::error::{MailError, SendError};

/// Port used when the configured port is zero.
pub const DEFAULT_PORT: u16 = 587;

/// Delivery posture for a send.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Log the message instead of sending it.
    #[default]
    Debug,
    /// Send, but skip certificate verification. For non-production servers.
    Test,
    /// Send with full TLS verification.
    Live,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Debug => "debug",
            Mode::Test => "test",
            Mode::Live => "live",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = MailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(Mode::Debug),
            "test" => Ok(Mode::Test),
            "live" => Ok(Mode::Live),
            other => Err(MailError::Configuration(format!(
                "unknown mode '{}', expected debug, test or live",
                other
            ))),
        }
    }
}

/// SMTP account, server and mode.
///
/// ```
/// use postbox::{MailConfig, Mode};
///
/// let config = MailConfig::new("smtp.example.com", "user@example.com", "secret")
///     .mode(Mode::Live)
///     .from(("My App", "noreply@example.com"));
///
/// assert_eq!(config.effective_port(), 587);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailConfig {
    /// Account used to authenticate, and the sender of last resort.
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// SMTP server host name.
    #[serde(default)]
    pub server: String,
    /// `0` means unset; see [`MailConfig::effective_port`].
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub mode: Mode,
    /// Default sender when a send has no explicit override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    /// Transport timeout. Lettre's default applies when unset.
    #[serde(
        default,
        rename = "timeout_secs",
        with = "timeout_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
}

impl MailConfig {
    /// Create a config with the three required fields, in Debug mode.
    pub fn new(
        server: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Set the server port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the delivery mode.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the default sender.
    pub fn from(mut self, addr: impl Into<Address>) -> Self {
        self.from = Some(addr.into());
        self
    }

    /// Set the transport timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The configured port, or [`DEFAULT_PORT`] when unset.
    pub fn effective_port(&self) -> u16 {
        if self.port == 0 {
            DEFAULT_PORT
        } else {
            self.port
        }
    }

    /// Check that username, password and server are all non-empty.
    ///
    /// Only the empty string counts as missing; whitespace is passed through.
    pub fn validate(&self) -> Result<(), SendError> {
        let missing: Vec<&'static str> = [
            ("username", &self.username),
            ("password", &self.password),
            ("server", &self.server),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SendError::ConfigInvalid { missing })
        }
    }

    /// Build a config from environment variables.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `SMTP_HOST` | `server` |
    /// | `SMTP_PORT` | `port` (default: 587) |
    /// | `SMTP_USERNAME` | `username` |
    /// | `SMTP_PASSWORD` | `password` |
    /// | `EMAIL_FROM` | `from` |
    /// | `EMAIL_FROM_NAME` | display name for `from` |
    /// | `EMAIL_MODE` | `mode` (`debug`, `test`, `live`; default: debug) |
    /// | `SMTP_TIMEOUT` | `timeout` in seconds |
    ///
    /// Missing variables are left empty; [`MailConfig::validate`] catches
    /// them at send time. Unparsable values are an error here.
    pub fn from_env() -> Result<Self, MailError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, MailError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("SMTP_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                MailError::Configuration(format!("SMTP_PORT '{}' is not a valid port", raw))
            })?,
            None => DEFAULT_PORT,
        };

        let mode = match lookup("EMAIL_MODE") {
            Some(raw) => raw.parse()?,
            None => Mode::default(),
        };

        let timeout = match lookup("SMTP_TIMEOUT") {
            Some(raw) => Some(Duration::from_secs(raw.trim().parse().map_err(|_| {
                MailError::Configuration(format!(
                    "SMTP_TIMEOUT '{}' is not a number of seconds",
                    raw
                ))
            })?)),
            None => None,
        };

        let from = lookup("EMAIL_FROM").map(|email| match lookup("EMAIL_FROM_NAME") {
            Some(name) => Address::with_name(name, email),
            None => Address::new(email),
        });

        Ok(Self {
            username: lookup("SMTP_USERNAME").unwrap_or_default(),
            password: lookup("SMTP_PASSWORD").unwrap_or_default(),
            server: lookup("SMTP_HOST").unwrap_or_default(),
            port,
            mode,
            from,
            timeout,
        })
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("mode", &self.mode)
            .field("from", &self.from)
            .field("timeout", &self.timeout)
            .finish()
    }
}

mod timeout_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_mode_is_debug() {
        assert_eq!(Mode::default(), Mode::Debug);
        assert_eq!(MailConfig::default().mode, Mode::Debug);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("live".parse::<Mode>().unwrap(), Mode::Live);
        assert_eq!(" TEST ".parse::<Mode>().unwrap(), Mode::Test);
        assert_eq!("Debug".parse::<Mode>().unwrap(), Mode::Debug);
        assert!(matches!(
            "production".parse::<Mode>(),
            Err(MailError::Configuration(msg)) if msg.contains("production")
        ));
    }

    #[test]
    fn test_effective_port() {
        let config = MailConfig::new("smtp.example.com", "u", "p");
        assert_eq!(config.effective_port(), DEFAULT_PORT);
        assert_eq!(config.clone().port(2525).effective_port(), 2525);
    }

    #[test]
    fn test_validate_reports_every_missing_field() {
        let err = MailConfig::default().validate().unwrap_err();
        match err {
            SendError::ConfigInvalid { missing } => {
                assert_eq!(missing, vec!["username", "password", "server"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = MailConfig::new("smtp.example.com", "user", "")
            .validate()
            .unwrap_err();
        assert!(matches!(err, SendError::ConfigInvalid { missing } if missing == vec!["password"]));
    }

    #[test]
    fn test_validate_accepts_whitespace_password() {
        let config = MailConfig::new("smtp.example.com", "user", "  ");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = MailConfig::new("smtp.example.com", "user", "hunter2");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("[redacted]"));
    }

    #[test]
    fn test_from_lookup_full() {
        let config = MailConfig::from_lookup(lookup_from(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "465"),
            ("SMTP_USERNAME", "user@example.com"),
            ("SMTP_PASSWORD", "secret"),
            ("EMAIL_FROM", "noreply@example.com"),
            ("EMAIL_FROM_NAME", "My App"),
            ("EMAIL_MODE", "live"),
            ("SMTP_TIMEOUT", "30"),
        ]))
        .unwrap();

        assert_eq!(config.server, "smtp.example.com");
        assert_eq!(config.port, 465);
        assert_eq!(config.username, "user@example.com");
        assert_eq!(config.password, "secret");
        assert_eq!(config.mode, Mode::Live);
        assert_eq!(
            config.from,
            Some(Address::with_name("My App", "noreply@example.com"))
        );
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = MailConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.mode, Mode::Debug);
        assert!(config.from.is_none());
        assert!(config.timeout.is_none());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        assert!(MailConfig::from_lookup(lookup_from(&[("SMTP_PORT", "abc")])).is_err());
        assert!(MailConfig::from_lookup(lookup_from(&[("SMTP_PORT", "70000")])).is_err());
        assert!(MailConfig::from_lookup(lookup_from(&[("EMAIL_MODE", "staging")])).is_err());
        assert!(MailConfig::from_lookup(lookup_from(&[("SMTP_TIMEOUT", "soon")])).is_err());
    }

    #[test]
    fn test_deserialize() {
        let config: MailConfig = serde_json::from_str(
            r#"{
                "username": "user",
                "password": "pass",
                "server": "smtp.example.com",
                "mode": "test",
                "from": "noreply@example.com",
                "timeout_secs": 10
            }"#,
        )
        .unwrap();

        assert_eq!(config.mode, Mode::Test);
        assert_eq!(config.port, 0);
        assert_eq!(config.effective_port(), 587);
        assert_eq!(config.from.unwrap().email, "noreply@example.com");
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
    }
}
