//! Recipient set for a single send.

use serde::{Deserialize, Serialize};

use crate::address::{Address, ToAddress};
use crate::error::SendError;

/// Who receives a message.
///
/// ```
/// use postbox::Recipients;
///
/// let recipients = Recipients::new()
///     .to("alice@example.com")
///     .to(("Bob", "bob@example.com"))
///     .cc("carol@example.com")
///     .bcc("audit@example.com");
///
/// assert_eq!(recipients.to.len(), 2);
/// assert!(recipients.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipients {
    /// Primary recipients. At least one is required to send.
    #[serde(default)]
    pub to: Vec<Address>,
    /// Carbon copy recipients
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<Address>,
    /// Blind carbon copy recipients
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<Address>,
}

impl Recipients {
    /// Create an empty recipient set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a primary recipient.
    pub fn to(mut self, addr: impl ToAddress) -> Self {
        self.to.push(addr.to_address());
        self
    }

    /// Add a carbon copy recipient.
    pub fn cc(mut self, addr: impl ToAddress) -> Self {
        self.cc.push(addr.to_address());
        self
    }

    /// Add a blind carbon copy recipient.
    pub fn bcc(mut self, addr: impl ToAddress) -> Self {
        self.bcc.push(addr.to_address());
        self
    }

    /// Replace all primary recipients.
    pub fn put_to<I, A>(mut self, addrs: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: ToAddress,
    {
        self.to = addrs.into_iter().map(|a| a.to_address()).collect();
        self
    }

    /// Check the set can be sent to.
    pub fn validate(&self) -> Result<(), SendError> {
        if self.to.is_empty() {
            return Err(SendError::NoRecipient);
        }
        Ok(())
    }

    /// Total number of addresses across to, cc and bcc.
    pub fn len(&self) -> usize {
        self.to.len() + self.cc.len() + self.bcc.len()
    }

    /// True when there are no addresses at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_primary_is_rejected() {
        let recipients = Recipients::new().cc("cc@example.com").bcc("bcc@example.com");
        assert!(matches!(recipients.validate(), Err(SendError::NoRecipient)));
    }

    #[test]
    fn test_cc_and_bcc_are_optional() {
        let recipients = Recipients::new().to("to@example.com");
        assert!(recipients.validate().is_ok());
        assert_eq!(recipients.len(), 1);
    }

    #[test]
    fn test_put_to_replaces() {
        let recipients = Recipients::new()
            .to("old@example.com")
            .put_to(["a@example.com", "b@example.com"]);
        let emails: Vec<_> = recipients.to.iter().map(|a| a.email.as_str()).collect();
        assert_eq!(emails, vec!["a@example.com", "b@example.com"]);
    }

    #[test]
    fn test_serde_skips_empty_lists() {
        let recipients = Recipients::new().to("to@example.com");
        let json = serde_json::to_value(&recipients).unwrap();
        assert!(json.get("cc").is_none());
        assert!(json.get("bcc").is_none());

        let parsed: Recipients =
            serde_json::from_str(r#"{"to": ["a@example.com"], "cc": ["b@example.com"]}"#).unwrap();
        assert_eq!(parsed.to[0].email, "a@example.com");
        assert_eq!(parsed.cc[0].email, "b@example.com");
        assert!(parsed.bcc.is_empty());
    }
}
