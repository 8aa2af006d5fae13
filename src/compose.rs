//! Render a named template between the shared header and footer, then send.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::MailConfig;
use crate::dispatch::{send_via, SendOptions};
use crate::error::MailError;
use crate::recipients::Recipients;
use crate::template::TemplateSet;
use crate::transport::{SmtpRelay, Transport};

/// Directory searched for fragments when no base path is given.
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// Fragment file extension when none is given.
pub const DEFAULT_TEMPLATE_EXTENSION: &str = "html";

/// Options for [`send_using_template`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateOptions {
    /// Directory holding `header`, `footer` and the named body. Defaults to
    /// [`DEFAULT_TEMPLATE_DIR`]; an empty path also means the default.
    pub base_path: Option<PathBuf>,
    /// Fragment extension without the dot. Defaults to
    /// [`DEFAULT_TEMPLATE_EXTENSION`].
    pub extension: Option<String>,
    /// Passed through to the send.
    pub send: SendOptions,
}

impl TemplateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    pub fn extension(mut self, ext: impl Into<String>) -> Self {
        self.extension = Some(ext.into());
        self
    }

    /// Override the sender.
    pub fn from(mut self, addr: impl Into<crate::Address>) -> Self {
        self.send = self.send.from(addr);
        self
    }

    fn resolved_base(&self) -> &Path {
        match &self.base_path {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => Path::new(DEFAULT_TEMPLATE_DIR),
        }
    }

    fn resolved_extension(&self) -> &str {
        match &self.extension {
            Some(ext) if !ext.is_empty() => ext.trim_start_matches('.'),
            _ => DEFAULT_TEMPLATE_EXTENSION,
        }
    }
}

/// The header, body and footer paths, in render order.
///
/// ```
/// use postbox::template_paths;
/// use std::path::PathBuf;
///
/// let paths = template_paths("emails", "welcome", "html");
/// assert_eq!(paths, [
///     PathBuf::from("emails/header.html"),
///     PathBuf::from("emails/welcome.html"),
///     PathBuf::from("emails/footer.html"),
/// ]);
/// ```
pub fn template_paths(base: impl AsRef<Path>, template_name: &str, ext: &str) -> [PathBuf; 3] {
    let base = base.as_ref();
    [
        base.join(format!("header.{ext}")),
        base.join(format!("{template_name}.{ext}")),
        base.join(format!("footer.{ext}")),
    ]
}

/// Render `{base}/header`, `{base}/{template_name}` and `{base}/footer` with
/// `data`, then [`send`](crate::send) the result.
///
/// Nothing is sent if any fragment fails to load or render. For more than
/// one body fragment, or a different layout, use [`TemplateSet`] and
/// [`send`](crate::send) directly.
///
/// ```no_run
/// use postbox::{send_using_template, MailConfig, Recipients, TemplateOptions};
/// use serde_json::json;
///
/// let config = MailConfig::from_env()?;
/// let recipients = Recipients::new().to("alice@example.com");
///
/// send_using_template(
///     &config,
///     &recipients,
///     "Welcome!",
///     "welcome",
///     &json!({ "name": "Alice" }),
///     &TemplateOptions::new().base_path("emails"),
/// )?;
/// # Ok::<(), postbox::MailError>(())
/// ```
pub fn send_using_template<D: Serialize + ?Sized>(
    config: &MailConfig,
    recipients: &Recipients,
    subject: &str,
    template_name: &str,
    data: &D,
    options: &TemplateOptions,
) -> Result<(), MailError> {
    send_using_template_via(
        &SmtpRelay,
        config,
        recipients,
        subject,
        template_name,
        data,
        options,
    )
}

/// Same as [`send_using_template`], delivering through `transport`.
pub fn send_using_template_via<T, D>(
    transport: &T,
    config: &MailConfig,
    recipients: &Recipients,
    subject: &str,
    template_name: &str,
    data: &D,
    options: &TemplateOptions,
) -> Result<(), MailError>
where
    T: Transport + ?Sized,
    D: Serialize + ?Sized,
{
    let paths = template_paths(
        options.resolved_base(),
        template_name,
        options.resolved_extension(),
    );

    let set = TemplateSet::from_paths(&paths)?;
    let body = set.render(data)?;

    send_via(transport, config, recipients, subject, &body, &options.send)?;
    Ok(())
}
