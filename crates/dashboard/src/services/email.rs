//! Email service for sending magic-link sign-in emails.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. Send
//! failures classify into three distinguishable kinds - host unreachable,
//! authentication failure, generic send failure - so the login route can
//! report a useful error code to the user.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;
use crate::services::auth::MAGIC_LINK_TTL_MINUTES;

/// HTML template for the magic-link email.
#[derive(Template)]
#[template(path = "email/magic_link.html")]
struct MagicLinkEmailHtml<'a> {
    verification_url: &'a str,
    expiry_minutes: i64,
}

/// Plain text template for the magic-link email.
#[derive(Template)]
#[template(path = "email/magic_link.txt")]
struct MagicLinkEmailText<'a> {
    verification_url: &'a str,
    expiry_minutes: i64,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP host unreachable (connection, network, timeout, TLS).
    #[error("SMTP host unreachable: {0}")]
    Connect(#[source] SmtpError),

    /// SMTP server rejected the configured credentials.
    #[error("SMTP authentication failed: {0}")]
    Auth(#[source] SmtpError),

    /// Generic send failure.
    #[error("SMTP error: {0}")]
    Send(#[source] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// SMTP reply codes that signal rejected credentials.
const AUTH_REPLY_CODES: &[&str] = &["530", "534", "535"];

/// Classify an SMTP transport error into one of the three reportable kinds.
fn classify_smtp(err: SmtpError) -> EmailError {
    if let Some(code) = err.status() {
        if AUTH_REPLY_CODES.contains(&code.to_string().as_str()) {
            return EmailError::Auth(err);
        }
        return EmailError::Send(err);
    }
    if err.is_response() || err.is_client() {
        EmailError::Send(err)
    } else {
        // connection, network, timeout, TLS handshake
        EmailError::Connect(err)
    }
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay configuration is invalid.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send a magic-link sign-in email.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or a template fails to render.
    pub async fn send_magic_link(
        &self,
        to: &str,
        verification_url: &str,
    ) -> Result<(), EmailError> {
        let html = MagicLinkEmailHtml {
            verification_url,
            expiry_minutes: MAGIC_LINK_TTL_MINUTES,
        }
        .render()?;
        let text = MagicLinkEmailText {
            verification_url,
            expiry_minutes: MAGIC_LINK_TTL_MINUTES,
        }
        .render()?;

        self.send_multipart_email(to, "Sign in to Vexa", &text, &html)
            .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await.map_err(classify_smtp)?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_link_templates_render_url() {
        let url = "http://localhost:3000/auth/verify?token=abc";
        let html = MagicLinkEmailHtml {
            verification_url: url,
            expiry_minutes: 15,
        }
        .render()
        .unwrap();
        let text = MagicLinkEmailText {
            verification_url: url,
            expiry_minutes: 15,
        }
        .render()
        .unwrap();

        assert!(html.contains(url));
        assert!(text.contains(url));
        assert!(text.contains("15"));
    }
}
