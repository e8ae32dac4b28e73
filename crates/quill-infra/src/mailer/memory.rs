//! In-memory mailer - used as fallback when SMTP is not configured.

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::ports::{Mailer, MailerError, OutboundEmail};

/// Mailer that records messages in an outbox instead of delivering them.
///
/// This is the fallback implementation when no SMTP relay is configured, and
/// doubles as an inspectable outbox in tests.
/// Note: Messages are lost on process restart.
pub struct InMemoryMailer {
    outbox: RwLock<Vec<OutboundEmail>>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self {
            outbox: RwLock::new(Vec::new()),
        }
    }

    /// Snapshot of the messages handed off so far.
    pub async fn sent(&self) -> Vec<OutboundEmail> {
        self.outbox.read().await.clone()
    }
}

impl Default for InMemoryMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailerError> {
        tracing::info!(subject = %email.subject, "Recording email in in-memory outbox");
        self.outbox.write().await.push(email);
        Ok(())
    }
}
