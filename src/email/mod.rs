//! # Email Delivery
//!
//! Outbound mail behind a trait: SMTP via lettre in production, a recording
//! mock in tests. The only template this API sends is the password-reset
//! link carrying the plaintext token.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::auth::errors::{AuthError, AuthResult};

/// SMTP and sender-identity configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub smtp_user: String,

    /// Should come from the environment, never a config file
    #[serde(default)]
    pub smtp_password: String,

    #[serde(default = "default_from_email")]
    pub from_email: String,

    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Base URL used when rendering links
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    1025
}

fn default_from_email() -> String {
    "noreply@campdir.local".to_string()
}

fn default_from_name() -> String {
    "CampDir".to_string()
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_user: String::new(),
            smtp_password: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            base_url: default_base_url(),
        }
    }
}

/// Outbound email kinds
#[derive(Debug, Clone)]
pub enum EmailTemplate {
    /// Password reset link carrying the plaintext token
    PasswordReset { token: String, user_email: String },
}

/// Email delivery seam
pub trait EmailSender: Send + Sync {
    fn send(&self, template: EmailTemplate) -> AuthResult<()>;
}

/// Recording sender for tests
#[derive(Debug, Default)]
pub struct MockEmailSender {
    sent: RwLock<Vec<EmailTemplate>>,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.read().map(|sent| sent.len()).unwrap_or(0)
    }

    /// Snapshot of everything sent so far
    pub fn sent(&self) -> Vec<EmailTemplate> {
        self.sent.read().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Plaintext token of the most recent reset email, if any
    pub fn last_reset_token(&self) -> Option<String> {
        self.sent().into_iter().rev().find_map(|template| {
            let EmailTemplate::PasswordReset { token, .. } = template;
            Some(token)
        })
    }
}

impl EmailSender for MockEmailSender {
    fn send(&self, template: EmailTemplate) -> AuthResult<()> {
        self.sent
            .write()
            .map_err(|_| AuthError::EmailSendFailed)?
            .push(template);
        Ok(())
    }
}

/// Sender that refuses every send, for exercising the failure path
#[derive(Debug, Default)]
pub struct FailingEmailSender;

impl EmailSender for FailingEmailSender {
    fn send(&self, _template: EmailTemplate) -> AuthResult<()> {
        Err(AuthError::EmailSendFailed)
    }
}

/// SMTP sender over lettre
pub struct SmtpEmailSender {
    config: EmailConfig,
}

impl SmtpEmailSender {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn render(&self, template: &EmailTemplate) -> (String, String, String) {
        match template {
            EmailTemplate::PasswordReset { token, user_email } => {
                let subject = "Reset your password".to_string();
                let link = format!(
                    "{}/api/v1/auth/resetpassword/{}",
                    self.config.base_url, token
                );
                let body = format!(
                    "Hello,\n\n\
                    You are receiving this email because you (or someone else) requested\n\
                    a password reset. Make a PUT request to:\n\n\
                    {}\n\n\
                    This link will expire in 10 minutes.\n\n\
                    If you didn't request this, you can ignore this email.\n\n\
                    Thanks,\n\
                    The CampDir Team",
                    link
                );
                (user_email.clone(), subject, body)
            }
        }
    }
}

impl EmailSender for SmtpEmailSender {
    fn send(&self, template: EmailTemplate) -> AuthResult<()> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials, Message,
            SmtpTransport, Transport,
        };

        let (to, subject, body) = self.render(&template);

        let email = Message::builder()
            .from(
                format!("{} <{}>", self.config.from_name, self.config.from_email)
                    .parse()
                    .map_err(|_| AuthError::EmailSendFailed)?,
            )
            .to(to.parse().map_err(|_| AuthError::EmailSendFailed)?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|_| AuthError::EmailSendFailed)?;

        let mailer = if self.config.smtp_user.is_empty() {
            // Unauthenticated transport for local development servers
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let credentials = Credentials::new(
                self.config.smtp_user.clone(),
                self.config.smtp_password.clone(),
            );
            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|_| AuthError::EmailSendFailed)?
                .credentials(credentials)
                .port(self.config.smtp_port)
                .build()
        };

        mailer.send(&email).map_err(|err| {
            tracing::error!(error = %err, "smtp send failed");
            AuthError::EmailSendFailed
        })?;

        Ok(())
    }
}
