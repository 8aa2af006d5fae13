//! Email address type with optional display name.

use email_address::EmailAddress;
use lettre::message::Mailbox;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SendError;

/// An email address with an optional display name.
///
/// # Examples
///
/// ```
/// use postbox::Address;
///
/// // From email string
/// let addr: Address = "user@example.com".into();
/// assert_eq!(addr.email, "user@example.com");
/// assert_eq!(addr.name, None);
///
/// // From tuple (name, email)
/// let addr: Address = ("Alice", "alice@example.com").into();
/// assert_eq!(addr.email, "alice@example.com");
/// assert_eq!(addr.name, Some("Alice".to_string()));
/// ```
///
/// When deserialized, either a plain string or a `{ name, email }` map is
/// accepted, so config files can write `from = "noreply@example.com"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AddressRepr")]
pub struct Address {
    /// Optional display name (e.g., "Alice Smith")
    pub name: Option<String>,
    /// Email address (e.g., "alice@example.com")
    pub email: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AddressRepr {
    Plain(String),
    Named { name: Option<String>, email: String },
}

impl From<AddressRepr> for Address {
    fn from(repr: AddressRepr) -> Self {
        match repr {
            AddressRepr::Plain(email) => Self { name: None, email },
            AddressRepr::Named { name, email } => Self { name, email },
        }
    }
}

impl Address {
    /// Create a new address with just an email.
    ///
    /// Logs a warning if the email looks obviously wrong. For strict
    /// validation, use [`Address::parse`] instead.
    pub fn new(email: impl Into<String>) -> Self {
        let email = email.into();

        if !Self::basic_sanity_check(&email) {
            tracing::warn!(
                email = %email,
                "Creating address with potentially invalid email. Use Address::parse() for strict validation."
            );
        }

        Self { name: None, email }
    }

    /// Create a new address with a name and email.
    pub fn with_name(name: impl Into<String>, email: impl Into<String>) -> Self {
        let email = email.into();

        if !Self::basic_sanity_check(&email) {
            tracing::warn!(
                email = %email,
                "Creating address with potentially invalid email. Use Address::parse() for strict validation."
            );
        }

        Self {
            name: Some(name.into()),
            email,
        }
    }

    /// Non-empty and contains `@`. Not a real validation.
    fn basic_sanity_check(email: &str) -> bool {
        !email.is_empty() && email.contains('@')
    }

    /// Set the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parse and validate an email address.
    ///
    /// ```
    /// use postbox::Address;
    ///
    /// let addr = Address::parse("user@example.com").unwrap();
    /// assert_eq!(addr.email, "user@example.com");
    ///
    /// assert!(Address::parse("not-an-email").is_err());
    /// assert!(Address::parse("").is_err());
    /// ```
    pub fn parse(email: &str) -> Result<Self, SendError> {
        if !EmailAddress::is_valid(email) {
            return Err(SendError::InvalidAddress(format!(
                "'{}' is not a valid email address",
                email
            )));
        }

        Ok(Self {
            name: None,
            email: email.to_string(),
        })
    }

    /// Whether the email part is the empty string.
    pub fn is_empty(&self) -> bool {
        self.email.is_empty()
    }

    /// Format as "Name <email>" or just "email" if no name.
    pub fn formatted(&self) -> String {
        match &self.name {
            Some(name) if name.is_empty() => self.email.clone(),
            Some(name) => format!("{} <{}>", name, self.email),
            None => self.email.clone(),
        }
    }

    /// Convert to lettre's mailbox for message headers.
    pub(crate) fn to_mailbox(&self) -> Result<Mailbox, SendError> {
        let email = self.email.trim().parse::<lettre::Address>().map_err(|e| {
            SendError::InvalidAddress(format!("'{}': {}", self.email, e))
        })?;

        let name = self.name.clone().filter(|n| !n.is_empty());
        Ok(Mailbox::new(name, email))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl From<&str> for Address {
    fn from(email: &str) -> Self {
        Self::new(email)
    }
}

impl From<String> for Address {
    fn from(email: String) -> Self {
        Self::new(email)
    }
}

impl From<&String> for Address {
    fn from(email: &String) -> Self {
        Self::new(email.as_str())
    }
}

// (name, email)
impl From<(&str, &str)> for Address {
    fn from((name, email): (&str, &str)) -> Self {
        Self::with_name(name, email)
    }
}

impl From<(String, String)> for Address {
    fn from((name, email): (String, String)) -> Self {
        Self::with_name(name, email)
    }
}

/// Trait for types that can be converted to an email address.
///
/// Implement this for your own user/contact types to pass them straight to
/// [`Recipients`](crate::Recipients) builder methods.
///
/// ```rust
/// use postbox::{Address, Recipients, ToAddress};
///
/// struct User {
///     name: String,
///     email: String,
/// }
///
/// impl ToAddress for User {
///     fn to_address(&self) -> Address {
///         Address::with_name(&self.name, &self.email)
///     }
/// }
///
/// let user = User { name: "Ada".into(), email: "ada@example.com".into() };
/// let recipients = Recipients::new().to(&user);
/// assert_eq!(recipients.to[0].email, "ada@example.com");
/// ```
pub trait ToAddress {
    fn to_address(&self) -> Address;
}

impl<T: ToAddress + ?Sized> ToAddress for &T {
    fn to_address(&self) -> Address {
        (*self).to_address()
    }
}

impl ToAddress for Address {
    fn to_address(&self) -> Address {
        self.clone()
    }
}

impl ToAddress for str {
    fn to_address(&self) -> Address {
        Address::new(self)
    }
}

impl ToAddress for String {
    fn to_address(&self) -> Address {
        Address::new(self)
    }
}

impl<N: AsRef<str>, E: AsRef<str>> ToAddress for (N, E) {
    fn to_address(&self) -> Address {
        Address::with_name(self.0.as_ref(), self.1.as_ref())
    }
}
