use crate::core::error::BotError;
use async_trait::async_trait;

/// Outbound channel for user-facing messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;
    async fn send(&self, text: &str) -> Result<(), BotError>;
}

pub async fn send_message(notifier: &dyn Notifier, message: &str) -> Result<(), BotError> {
    match notifier.send(message).await {
        Ok(()) => {
            tracing::info!(notifier = notifier.name(), "Message sent");
            Ok(())
        }
        Err(e) => {
            tracing::error!(notifier = notifier.name(), error = %e, "Message not sent");
            Err(e)
        }
    }
}
