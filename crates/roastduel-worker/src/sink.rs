//! Narrative sink that writes to the log.

use async_trait::async_trait;
use roastduel_core::duel::DuelId;
use roastduel_core::error::DuelError;
use roastduel_core::ports::NarrativeSink;
use tracing::info;

/// Emits each narrative as a structured log event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[async_trait]
impl NarrativeSink for TracingSink {
    async fn publish(&self, duel_id: &DuelId, narrative: &str) -> Result<(), DuelError> {
        info!(%duel_id, narrative, "narrative published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_always_succeeds() {
        let result = TracingSink
            .publish(&DuelId::new("d1"), "⚔️ The Roast Battle Begins!")
            .await;

        assert!(result.is_ok());
    }
}
