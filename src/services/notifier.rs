//! Outbound delivery capability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::RecipientId;

/// Delivers a plain text payload to a recipient.
///
/// Implemented by the transport layer (chat bot, webhook, ...).
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, recipient: RecipientId, text: &str) -> Result<()>;
}

/// Prints deliveries to stdout. Used by the CLI for local runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn deliver(&self, recipient: RecipientId, text: &str) -> Result<()> {
        log::info!("Delivering update to recipient {}", recipient);
        println!("── to {} ──\n{}\n", recipient, text);
        Ok(())
    }
}
