//! # Postbox
//!
//! Compose templated HTML emails and send them over SMTP.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use postbox::{send, MailConfig, Mode, Recipients, SendOptions};
//!
//! let config = MailConfig::new("smtp.example.com", "user@example.com", "secret")
//!     .mode(Mode::Live)
//!     .from("noreply@example.com");
//!
//! let recipients = Recipients::new()
//!     .to("alice@example.com")
//!     .cc("bob@example.com");
//!
//! send(&config, &recipients, "Welcome!", "<h1>Hello</h1>", &SendOptions::default())?;
//! # Ok::<(), postbox::SendError>(())
//! ```
//!
//! ## Templates
//!
//! [`TemplateSet`] loads fragments in order and renders them back to back:
//!
//! ```rust,no_run
//! use postbox::TemplateSet;
//! use serde_json::json;
//!
//! let set = TemplateSet::from_paths(["emails/header.html", "emails/body.html", "emails/footer.html"])?;
//! let html = set.render(&json!({ "name": "Alice" }))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`send_using_template`] does both for the usual header/body/footer layout.
//!
//! ## Modes
//!
//! | Mode | Behaviour |
//! |------|-----------|
//! | `Debug` | Logs sender, recipients and subject via `tracing`; nothing is sent |
//! | `Test` | Sends, accepting any server certificate |
//! | `Live` | Sends with full TLS verification |
//!
//! ## Environment Variables
//!
//! [`MailConfig::from_env`] reads:
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `SMTP_HOST` | SMTP server host |
//! | `SMTP_PORT` | SMTP server port (default: 587) |
//! | `SMTP_USERNAME` | SMTP username |
//! | `SMTP_PASSWORD` | SMTP password |
//! | `EMAIL_FROM` | Default sender email |
//! | `EMAIL_FROM_NAME` | Default sender name |
//! | `EMAIL_MODE` | `debug`, `test` or `live` (default: debug) |
//! | `SMTP_TIMEOUT` | Transport timeout in seconds |
//!
//! ## Logging
//!
//! Events are emitted with `tracing`. Install a subscriber (for example
//! `tracing-subscriber`) in your application to see Debug-mode records.

/// The version of the postbox crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod address;
mod compose;
mod config;
mod dispatch;
mod error;
mod recipients;
mod template;

pub mod transport;

pub use address::{Address, ToAddress};
pub use compose::{
    send_using_template, send_using_template_via, template_paths, TemplateOptions,
    DEFAULT_TEMPLATE_DIR, DEFAULT_TEMPLATE_EXTENSION,
};
pub use config::{MailConfig, Mode, DEFAULT_PORT};
pub use dispatch::{build_message, resolve_sender, send, send_via, SendOptions};
pub use error::{MailError, ParseError, RenderError, SendError};
pub use recipients::Recipients;
pub use template::TemplateSet;
