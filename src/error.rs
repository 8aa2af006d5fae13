//! Error types for postbox.
//!
//! Each component has its own error enum. [`MailError`] wraps them for the
//! render-then-send helper and adds what that layer was attempting.

use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

use crate::transport::TransportError;

/// Errors returned by [`send`](crate::send) and [`send_via`](crate::send_via).
#[derive(Debug, Error)]
pub enum SendError {
    /// One or more required configuration fields are empty.
    #[error("SMTP configuration is missing required fields: {}", .missing.join(", "))]
    ConfigInvalid {
        /// Names of the empty fields, in `username`, `password`, `server` order.
        missing: Vec<&'static str>,
    },

    /// The primary recipient list is empty.
    #[error("no primary recipient specified")]
    NoRecipient,

    /// An address could not be converted into a mailbox.
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// The message could not be assembled.
    #[error("failed to build message: {0}")]
    Build(String),

    /// The transport reported a failure.
    #[error("failed to send email: {cause}")]
    DeliveryFailed {
        #[source]
        cause: TransportError,
    },
}

impl From<lettre::error::Error> for SendError {
    fn from(err: lettre::error::Error) -> Self {
        Self::Build(err.to_string())
    }
}

impl From<lettre::address::AddressError> for SendError {
    fn from(err: lettre::address::AddressError) -> Self {
        Self::InvalidAddress(err.to_string())
    }
}

/// Errors returned while loading template fragments.
#[derive(Debug, Error)]
pub enum ParseError {
    /// `parse` was called with an empty list.
    #[error("no template files provided")]
    NoTemplatesProvided,

    /// A fragment file could not be read.
    #[error("failed to read template {}: {source}", .path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A fragment contains malformed template markup.
    #[error("failed to parse template {name}: {}", describe(.source))]
    SyntaxError {
        name: String,
        #[source]
        source: tera::Error,
    },
}

/// Errors returned while rendering a loaded [`TemplateSet`](crate::TemplateSet).
#[derive(Debug, Error)]
pub enum RenderError {
    /// No successful parse preceded the render call.
    #[error("templates not loaded")]
    TemplatesNotLoaded,

    /// The render data did not serialize to a map.
    #[error("invalid template data: {}", describe(.0))]
    InvalidContext(#[source] tera::Error),

    /// A fragment recorded in the render order is not in the namespace.
    #[error("template {name} not found")]
    FragmentMissing { name: String },

    /// A fragment failed while executing against the data.
    #[error("failed to execute template {name}: {}", describe(.source))]
    ExecutionError {
        name: String,
        #[source]
        source: tera::Error,
    },
}

/// Errors from the render-then-send helper and environment configuration.
#[derive(Debug, Error)]
pub enum MailError {
    /// Configuration could not be read (bad env var value, etc.)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Loading the header/body/footer fragments failed.
    #[error("failed parsing templates: {0}")]
    Parse(#[source] ParseError),

    /// Rendering the loaded fragments failed.
    #[error("failed rendering template: {0}")]
    Render(#[source] RenderError),

    /// Sending the rendered body failed.
    #[error("failed sending email: {0}")]
    Send(#[source] SendError),
}

impl From<ParseError> for MailError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<RenderError> for MailError {
    fn from(err: RenderError) -> Self {
        Self::Render(err)
    }
}

impl From<SendError> for MailError {
    fn from(err: SendError) -> Self {
        Self::Send(err)
    }
}

/// Flatten a tera error chain into one line.
///
/// Tera keeps the useful detail (line/column, undefined variable name) in
/// nested sources; the top-level message alone only names the template.
fn describe(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
