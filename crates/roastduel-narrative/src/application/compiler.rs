//! Narrative compiler: resolves a finished duel's roasts and assembles its
//! narrative. All or nothing: if any turn fails to resolve, no narrative is
//! produced.

use std::sync::Arc;

use futures::future::try_join_all;
use roastduel_core::content::ContentAddress;
use roastduel_core::duel::Duel;
use roastduel_core::error::DuelError;
use roastduel_core::ports::ContentStore;
use roastduel_core::retry::{RetryPolicy, retry_transient};
use tracing::{debug, instrument};

use crate::domain::narrative::Narrative;
use crate::domain::tally;

/// Compiles narratives from finished duels.
#[derive(Clone)]
pub struct NarrativeCompiler {
    store: Arc<dyn ContentStore>,
    retry: RetryPolicy,
}

impl NarrativeCompiler {
    /// Creates a compiler that reads roasts from `store`.
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Compiles the narrative of `duel`.
    ///
    /// # Errors
    ///
    /// Returns `DuelError::Validation` if the duel is unresolved or missing
    /// content, `DuelError::InvariantViolation` if its turns contradict its
    /// recorded winner, and the store's error if any roast cannot be read.
    #[instrument(skip_all, fields(duel_id = %duel.id, turns = duel.turns.len()))]
    pub async fn compile(&self, duel: &Duel) -> Result<Narrative, DuelError> {
        let margin = tally::check_finished(duel)?;

        let fetches = duel
            .turns
            .iter()
            .filter_map(|turn| turn.content.as_ref())
            .map(|address| self.fetch_roast(address));
        let roasts = try_join_all(fetches).await?;

        let narrative = Narrative::assemble(duel, margin, &roasts)?;
        debug!(?margin, "narrative compiled");
        Ok(narrative)
    }

    async fn fetch_roast(&self, address: &ContentAddress) -> Result<String, DuelError> {
        let store = &self.store;
        let bytes = retry_transient(&self.retry, "store.get", move || store.get(address)).await?;
        let text = String::from_utf8(bytes).map_err(|_| {
            DuelError::Infrastructure(format!("content {address} is not valid UTF-8"))
        })?;
        Ok(text.trim().to_owned())
    }
}
