//! Render header/welcome/footer from `demos/templates` and send.
//!
//! Reads SMTP settings from the environment (see `MailConfig::from_env`),
//! falling back to Debug mode, so by default nothing leaves the machine:
//!
//! ```bash
//! cargo run --example simpler
//! EMAIL_MODE=test SMTP_HOST=localhost SMTP_PORT=1025 SMTP_USERNAME=u SMTP_PASSWORD=p \
//!     cargo run --example simpler
//! ```

use postbox::{send_using_template, MailConfig, MailError, Recipients, TemplateOptions};
use serde_json::json;

fn main() -> Result<(), MailError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postbox=info".into()),
        )
        .init();

    let mut config = MailConfig::from_env()?;
    if config.server.is_empty() {
        config = MailConfig::new("smtp.example.com", "your-email@example.com", "password");
    }

    let recipients = Recipients::new().to("test@example.com");

    send_using_template(
        &config,
        &recipients,
        "Welcome!",
        "welcome",
        &json!({ "name": "Abiodun" }),
        &TemplateOptions::new().base_path("demos/templates"),
    )?;

    println!("Email sent!");
    Ok(())
}
