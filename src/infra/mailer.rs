//! Outbound email via SMTP.
//!
//! When SMTP is not configured (no `SMTP_HOST`), messages are logged
//! instead of sent so development does not depend on a mail server.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Mail sender trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a plain text email
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
}

/// SMTP mailer built from environment configuration.
pub struct SmtpMailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl SmtpMailer {
    /// Build a mailer from SMTP settings. Without a host the mailer
    /// runs in log-only mode.
    pub fn from_config(config: &SmtpConfig) -> Self {
        if !config.is_configured() {
            tracing::warn!("SMTP not configured - emails will be logged instead of sent");
        }

        let transport = config.host.as_deref().map(|host| {
            let mut builder =
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(config.port);

            if let (Some(user), Some(pass)) = (&config.user, &config.pass) {
                builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
            }

            builder.build()
        });

        Self {
            transport,
            from: config.from.clone(),
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let Some(transport) = &self.transport else {
            tracing::info!(
                "=== EMAIL (not sent) ===\n\
                 From: {}\n\
                 To: {}\n\
                 Subject: {}\n\
                 Body:\n{}\n\
                 ========================",
                self.from,
                to,
                subject,
                body
            );
            return Ok(());
        };

        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| AppError::Mail(format!("invalid sender address: {}", e)))?,
            )
            .to(to
                .parse()
                .map_err(|e| AppError::Mail(format!("invalid recipient address: {}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::Mail(e.to_string()))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::Mail(e.to_string()))?;

        tracing::info!(to = %to, subject = %subject, "Email sent");
        Ok(())
    }
}
