//! Email delivery over SMTP.
//!
//! Credentials come from the environment, never from config.toml, so the
//! config file stays safe to commit.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::{AppError, Result};

/// SMTP settings read from the environment.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_pass: String,
    pub sender: String,
    pub recipient: String,
}

impl EmailConfig {
    /// Load SMTP settings from the environment.
    ///
    /// `SMTP_HOST`, `SMTP_USER`, `SMTP_PASS`, and `RECIPIENT_EMAIL` are
    /// required. `SMTP_PORT` defaults to 587 and `SENDER_EMAIL` defaults to
    /// the SMTP user.
    pub fn from_env() -> Result<Self> {
        let smtp_host = require_env("SMTP_HOST")?;
        let smtp_user = require_env("SMTP_USER")?;
        let smtp_pass = require_env("SMTP_PASS")?;
        let recipient = require_env("RECIPIENT_EMAIL")?;

        let smtp_port = match std::env::var("SMTP_PORT") {
            Ok(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::config(format!("SMTP_PORT is not a valid port: {value}")))?,
            Err(_) => 587,
        };

        let sender = std::env::var("SENDER_EMAIL").unwrap_or_else(|_| smtp_user.clone());

        Ok(Self {
            smtp_host,
            smtp_port,
            smtp_user,
            smtp_pass,
            sender,
            recipient,
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::config(format!(
            "missing required environment variable {name}"
        ))),
    }
}

/// Sends HTML digests through an async SMTP transport with STARTTLS.
pub struct Mailer {
    config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl Mailer {
    pub fn new(config: EmailConfig) -> Result<Self> {
        let credentials =
            Credentials::new(config.smtp_user.clone(), config.smtp_pass.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(AppError::delivery)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self { config, transport })
    }

    /// Send an HTML message to the configured recipient.
    pub async fn send(&self, subject: &str, html_body: String) -> Result<()> {
        let message = Message::builder()
            .from(
                self.config
                    .sender
                    .parse()
                    .map_err(AppError::delivery)?,
            )
            .to(self
                .config
                .recipient
                .parse()
                .map_err(AppError::delivery)?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body)
            .map_err(AppError::delivery)?;

        self.transport
            .send(message)
            .await
            .map_err(AppError::delivery)?;

        log::info!("Email sent to {}", self.config.recipient);
        Ok(())
    }
}
