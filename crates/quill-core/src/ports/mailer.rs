use async_trait::async_trait;

/// A plain-text email ready for handoff to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    /// Address replies should go to, when different from the system sender.
    pub reply_to: Option<String>,
    pub subject: String,
    pub body: String,
}

/// Outbound mail transport - abstraction over SMTP and the in-memory outbox.
///
/// Implementations report the result of the handoff, not of actual delivery.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Hand one message to the transport.
    async fn send(&self, email: OutboundEmail) -> Result<(), MailerError>;
}

/// Mail handoff errors.
#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("Mailer misconfigured: {0}")]
    Configuration(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Transport failed: {0}")]
    Transport(String),
}
