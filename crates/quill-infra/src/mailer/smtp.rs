//! SMTP mailer on top of lettre's async transport.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use quill_core::ports::{Mailer, MailerError, OutboundEmail};

/// Settings for the SMTP relay.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender address shown on outgoing notifications.
    pub from: String,
}

/// Mailer that hands messages to an SMTP relay over TLS.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailerError> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| MailerError::Configuration(format!("Invalid sender address: {e}")))?;

        let creds = Credentials::new(config.username.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| MailerError::Configuration(format!("Invalid SMTP host: {e}")))?
            .credentials(creds)
            .port(config.port)
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailerError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(email
                .to
                .parse()
                .map_err(|e| MailerError::InvalidAddress(format!("Invalid to address: {e}")))?)
            .subject(&email.subject);

        if let Some(reply_to) = &email.reply_to {
            builder = builder.reply_to(reply_to.parse().map_err(|e| {
                MailerError::InvalidAddress(format!("Invalid reply-to address: {e}"))
            })?);
        }

        let message = builder
            .header(ContentType::TEXT_PLAIN)
            .body(email.body)
            .map_err(|e| MailerError::Transport(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailerError::Transport(e.to_string()))?;

        tracing::debug!(subject = %email.subject, "Message handed to SMTP relay");
        Ok(())
    }
}
