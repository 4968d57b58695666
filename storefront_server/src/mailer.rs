//! Transactional email relay over SMTP.
//!
//! A thin forwarder to the configured SMTP provider. Required fields are validated
//! before a transport is even built, the transport connection is verified on every
//! send, and the provider's response line is returned as the receipt.

use lettre::{
    message::{Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport,
    AsyncTransport,
    Message,
    Tokio1Executor,
};
use log::*;
use pgs_common::{helpers::parse_boolean_flag, Secret};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Missing required field. {0}")]
    Validation(String),
    #[error("SMTP is not configured. {0}")]
    Config(String),
    #[error("The mail transport rejected the message. {0}")]
    Transport(String),
}

//--------------------------------------     MailConfig     -----------------------------------------------------------
#[derive(Debug, Clone, Default)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub username: String,
    pub password: Secret<String>,
    pub from: String,
}

impl MailConfig {
    pub fn from_env_or_default() -> Self {
        let host = std::env::var("PGS_SMTP_HOST").unwrap_or_else(|_| {
            warn!("📧️ PGS_SMTP_HOST is not set. Email sends will fail with a configuration error.");
            String::default()
        });
        let username = std::env::var("PGS_SMTP_USER").map(|s| s.trim().to_string()).unwrap_or_default();
        // App passwords are often pasted with spaces. Strip them.
        let password = std::env::var("PGS_SMTP_PASS")
            .map(|s| Secret::new(s.split_whitespace().collect::<String>()))
            .unwrap_or_default();
        let secure_flag = std::env::var("PGS_SMTP_SECURE").ok();
        let port = std::env::var("PGS_SMTP_PORT").ok().and_then(|s| s.parse::<u16>().ok());
        let secure = parse_boolean_flag(secure_flag, false) || port == Some(465);
        let port = port.unwrap_or(if secure { 465 } else { 587 });
        let from = std::env::var("PGS_MAIL_FROM").unwrap_or_else(|_| username.clone());
        Self { host, port, secure, username, password, from }
    }

    fn is_configured(&self) -> bool {
        !self.host.is_empty() && !self.username.is_empty() && !self.password.reveal().is_empty()
    }
}

//--------------------------------------    EmailRequest    -----------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRequest {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
}

impl EmailRequest {
    /// Fail fast on anything the provider would bounce anyway.
    pub fn validate(&self) -> Result<(&str, &str), MailerError> {
        let to = self
            .to
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| MailerError::Validation("'to' is required".to_string()))?;
        let subject = self
            .subject
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| MailerError::Validation("'subject' is required".to_string()))?;
        Ok((to, subject))
    }
}

//--------------------------------------       Mailer       -----------------------------------------------------------
#[derive(Clone)]
pub struct Mailer {
    config: MailConfig,
}

impl Mailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailerError> {
        if !self.config.is_configured() {
            return Err(MailerError::Config("SMTP host/user/password are not all set".to_string()));
        }
        let credentials = Credentials::new(self.config.username.clone(), self.config.password.reveal().clone());
        let builder = if self.config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)
                .map_err(|e| MailerError::Config(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)
                .map_err(|e| MailerError::Config(e.to_string()))?
        };
        Ok(builder.port(self.config.port).credentials(credentials).build())
    }

    fn build_message(&self, to: &str, subject: &str, request: &EmailRequest) -> Result<Message, MailerError> {
        let from: Mailbox = self.config.from.parse().map_err(|e| MailerError::Config(format!("Bad from address: {e}")))?;
        let to: Mailbox = to.parse().map_err(|e| MailerError::Validation(format!("Bad 'to' address: {e}")))?;
        let builder = Message::builder().from(from).to(to).subject(subject);
        let text = request.text.clone().unwrap_or_default();
        let message = match &request.html {
            Some(html) => builder.multipart(MultiPart::alternative_plain_html(text, html.clone())),
            None => builder.singlepart(SinglePart::plain(text)),
        };
        message.map_err(|e| MailerError::Transport(e.to_string()))
    }

    /// Verify the transport connection, then send. Returns the provider's response line
    /// as the receipt.
    pub async fn send(&self, request: &EmailRequest) -> Result<String, MailerError> {
        let (to, subject) = request.validate()?;
        let transport = self.transport()?;
        debug!("📧️ Verifying SMTP connection to {}:{}", self.config.host, self.config.port);
        let connected = transport.test_connection().await.map_err(|e| MailerError::Transport(e.to_string()))?;
        if !connected {
            return Err(MailerError::Transport("SMTP connection test failed".to_string()));
        }
        let message = self.build_message(to, subject, request)?;
        let response = transport.send(message).await.map_err(|e| MailerError::Transport(e.to_string()))?;
        let receipt = response.message().collect::<Vec<&str>>().join(" ");
        info!("📧️ Sent email to {to}. Receipt: {receipt}");
        Ok(receipt)
    }
}
