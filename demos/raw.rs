//! Send a literal HTML body without templates.
//!
//! Runs in Debug mode, so the message is logged instead of sent:
//!
//! ```bash
//! cargo run --example raw
//! ```

use postbox::{send, MailConfig, Mode, Recipients, SendOptions};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postbox=debug".into()),
        )
        .init();

    let config = MailConfig::new("smtp.example.com", "your-email@example.com", "your-email-password")
        .port(587)
        .mode(Mode::Debug)
        .from("no-reply@example.com");

    let recipients = Recipients::new()
        .to("recipient1@example.com")
        .cc("cc@example.com")
        .bcc("bcc@example.com");

    let message = r#"
    <h1>Hi there!</h1>
    <p>This is a test email sent with postbox::send, no templates involved.</p>
    "#;

    if let Err(err) = send(&config, &recipients, "Hello from postbox", message, &SendOptions::default()) {
        eprintln!("Failed to send email: {err}");
        std::process::exit(1);
    }

    println!("Email sent successfully!");
}
