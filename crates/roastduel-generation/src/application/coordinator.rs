//! Generation coordinator: one generation pass over every outstanding turn.
//!
//! Per request the pipeline is validate → synthesize → `store.put` → confirm
//! the address resolves → `ledger.commit`. A failing request is reported and
//! left outstanding for the next pass; it never stops the others. Requests of
//! one duel run in turn order, different duels run concurrently.

use std::sync::Arc;

use futures::StreamExt;
use futures::stream;
use roastduel_core::content::ContentAddress;
use roastduel_core::duel::{DuelId, GenerationRequest};
use roastduel_core::error::{DuelError, ErrorKind};
use roastduel_core::ports::{ContentStore, DuelLedger};
use roastduel_core::retry::{RetryPolicy, retry_transient};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::application::synthesizer::RoastSynthesizer;
use crate::domain::prompt::RoastPrompt;
use crate::domain::requests;

/// Default number of duels processed concurrently.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// A turn whose roast was stored and committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedTurn {
    /// Duel the turn belongs to.
    pub duel_id: DuelId,
    /// Index of the turn.
    pub turn_index: usize,
    /// Address committed to the ledger.
    pub address: ContentAddress,
}

/// A turn that stays outstanding after this pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedTurn {
    /// Duel the turn belongs to.
    pub duel_id: DuelId,
    /// Index of the turn.
    pub turn_index: usize,
    /// Kind of the failure.
    pub kind: ErrorKind,
    /// Human-readable failure.
    pub error: String,
}

/// Outcome of one generation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Requests enumerated at the start of the pass.
    pub outstanding: usize,
    /// Requests completed, in completion order.
    pub generated: Vec<GeneratedTurn>,
    /// Requests that failed and remain outstanding.
    pub failed: Vec<FailedTurn>,
}

/// Drives outstanding generation requests to committed content.
#[derive(Clone)]
pub struct GenerationCoordinator {
    ledger: Arc<dyn DuelLedger>,
    store: Arc<dyn ContentStore>,
    synthesizer: RoastSynthesizer,
    retry: RetryPolicy,
    concurrency: usize,
}

impl GenerationCoordinator {
    /// Creates a coordinator over the given adapters.
    #[must_use]
    pub fn new(
        ledger: Arc<dyn DuelLedger>,
        store: Arc<dyn ContentStore>,
        synthesizer: RoastSynthesizer,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            ledger,
            store,
            synthesizer,
            retry,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Sets how many duels are processed concurrently. Zero behaves like one.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Runs one generation pass.
    ///
    /// # Errors
    ///
    /// Returns an error only for pass-level failures: the outstanding list
    /// could not be read, or it violates a ledger invariant. Item failures
    /// are reported in [`GenerationReport::failed`].
    #[instrument(skip(self))]
    pub async fn run_pass(&self) -> Result<GenerationReport, DuelError> {
        let ledger = &self.ledger;
        let outstanding = retry_transient(&self.retry, "ledger.list_outstanding", move || {
            ledger.list_outstanding_generation_requests()
        })
        .await?;

        if outstanding.is_empty() {
            debug!("no outstanding generation requests");
            return Ok(GenerationReport::default());
        }

        let total = outstanding.len();
        info!(outstanding = total, "starting generation pass");
        let batches = requests::plan_batches(outstanding)?;

        let outcomes: Vec<Vec<(GenerationRequest, Result<ContentAddress, DuelError>)>> =
            stream::iter(batches)
                .map(|batch| self.process_batch(batch))
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

        let mut report = GenerationReport {
            outstanding: total,
            ..GenerationReport::default()
        };
        for (request, outcome) in outcomes.into_iter().flatten() {
            match outcome {
                Ok(address) => report.generated.push(GeneratedTurn {
                    duel_id: request.duel_id,
                    turn_index: request.turn_index,
                    address,
                }),
                Err(err) => {
                    warn!(
                        duel_id = %request.duel_id,
                        turn_index = request.turn_index,
                        kind = ?err.kind(),
                        error = %err,
                        "generation failed, turn stays outstanding"
                    );
                    report.failed.push(FailedTurn {
                        duel_id: request.duel_id,
                        turn_index: request.turn_index,
                        kind: err.kind(),
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            generated = report.generated.len(),
            failed = report.failed.len(),
            "generation pass finished"
        );
        Ok(report)
    }

    /// Processes one duel's requests strictly in turn order.
    async fn process_batch(
        &self,
        batch: Vec<GenerationRequest>,
    ) -> Vec<(GenerationRequest, Result<ContentAddress, DuelError>)> {
        let mut outcomes = Vec::with_capacity(batch.len());
        for request in batch {
            let outcome = self.process_request(&request).await;
            outcomes.push((request, outcome));
        }
        outcomes
    }

    /// Generates, stores and commits the roast for one request.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error: validation, generation,
    /// upload, confirmation read or commit.
    #[instrument(
        skip(self, request),
        fields(duel_id = %request.duel_id, turn_index = request.turn_index)
    )]
    pub async fn process_request(
        &self,
        request: &GenerationRequest,
    ) -> Result<ContentAddress, DuelError> {
        let severity = requests::validate(request)?;
        let prompt = RoastPrompt::for_request(request, severity);

        let synthesizer = &self.synthesizer;
        let prompt = &prompt;
        let roast = retry_transient(&self.retry, "generator.complete", move || {
            synthesizer.synthesize(prompt)
        })
        .await?;

        let store = &self.store;
        let bytes = roast.as_bytes();
        let address = retry_transient(&self.retry, "store.put", move || store.put(bytes)).await?;
        self.confirm_resolvable(&address, bytes).await?;

        let ledger = &self.ledger;
        let committed = &address;
        retry_transient(&self.retry, "ledger.commit", move || {
            ledger.commit_turn_content(&request.duel_id, request.turn_index, committed)
        })
        .await?;

        info!(%address, %severity, roast = %roast, "roast committed");
        Ok(address)
    }

    /// Reads the uploaded content back until it resolves, so a commit never
    /// points at content readers cannot fetch yet.
    async fn confirm_resolvable(
        &self,
        address: &ContentAddress,
        expected: &[u8],
    ) -> Result<(), DuelError> {
        let store = &self.store;
        let stored = retry_transient(&self.retry, "store.get", move || store.get(address)).await?;
        if stored != expected {
            return Err(DuelError::Infrastructure(format!(
                "store returned different content for {address}"
            )));
        }
        Ok(())
    }
}
