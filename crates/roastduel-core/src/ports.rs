//! Ports to the external services the pipeline drives.
//!
//! Adapters are constructed explicitly and handed to the coordinator and
//! compiler as `Arc<dyn ...>` handles; nothing in the pipeline holds global
//! clients.

use async_trait::async_trait;

use crate::content::ContentAddress;
use crate::duel::{Duel, DuelId, DuelSummary, GenerationRequest};
use crate::error::DuelError;

/// The authoritative duel state.
#[async_trait]
pub trait DuelLedger: Send + Sync {
    /// Lists every committed turn whose content has not been generated yet.
    async fn list_outstanding_generation_requests(
        &self,
    ) -> Result<Vec<GenerationRequest>, DuelError>;

    /// Records the content address for a turn.
    ///
    /// Committing the address already stored is a no-op. Committing a
    /// different address to a filled slot is rejected with
    /// [`DuelError::CommitRejected`].
    async fn commit_turn_content(
        &self,
        duel_id: &DuelId,
        turn_index: usize,
        address: &ContentAddress,
    ) -> Result<(), DuelError>;

    /// Loads a duel, or `None` if the ledger does not know it.
    async fn get_duel(&self, duel_id: &DuelId) -> Result<Option<Duel>, DuelError>;

    /// Lists up to `limit` finished duels, most recent first.
    async fn list_finished_duels(&self, limit: usize) -> Result<Vec<DuelSummary>, DuelError>;
}

/// Text generation service.
#[async_trait]
pub trait RoastGenerator: Send + Sync {
    /// Completes `prompt` in a single request.
    async fn complete(&self, prompt: &str) -> Result<String, DuelError>;
}

/// Content-addressed blob store.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Uploads `bytes`. Identical bytes always yield the same address.
    async fn put(&self, bytes: &[u8]) -> Result<ContentAddress, DuelError>;

    /// Fetches the bytes behind `address`.
    ///
    /// Returns [`DuelError::NotYetResolvable`] while freshly uploaded content
    /// is still propagating and [`DuelError::ContentNotFound`] when the store
    /// knows the address will never resolve.
    async fn get(&self, address: &ContentAddress) -> Result<Vec<u8>, DuelError>;
}

/// Destination for compiled narratives.
#[async_trait]
pub trait NarrativeSink: Send + Sync {
    /// Publishes the rendered narrative of one duel.
    async fn publish(&self, duel_id: &DuelId, narrative: &str) -> Result<(), DuelError>;
}
