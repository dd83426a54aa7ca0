//! Narrative pass: pick the top finished duel, compile it, publish it.

use std::sync::Arc;

use chrono::Duration;
use roastduel_core::clock::Clock;
use roastduel_core::duel::DuelId;
use roastduel_core::error::DuelError;
use roastduel_core::ports::{DuelLedger, NarrativeSink};
use roastduel_core::retry::{RetryPolicy, call_once, retry_transient};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::application::compiler::NarrativeCompiler;
use crate::domain::selection;

/// Default number of finished duels considered per pass.
pub const DEFAULT_FINISHED_LIMIT: usize = 50;

/// Outcome of one narrative pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NarrativeReport {
    /// Finished duels listed by the ledger.
    pub considered: usize,
    /// The duel chosen for narration, if any qualified.
    pub selected: Option<DuelId>,
    /// Number of posts published for the selected duel.
    pub posts: usize,
}

/// Publishes the narrative of the most notable recently finished duel.
pub struct NarrativePass {
    ledger: Arc<dyn DuelLedger>,
    compiler: NarrativeCompiler,
    sink: Arc<dyn NarrativeSink>,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
    window: Duration,
    limit: usize,
}

impl NarrativePass {
    /// Creates a pass looking back over `window`.
    #[must_use]
    pub fn new(
        ledger: Arc<dyn DuelLedger>,
        compiler: NarrativeCompiler,
        sink: Arc<dyn NarrativeSink>,
        clock: Arc<dyn Clock>,
        retry: RetryPolicy,
        window: Duration,
    ) -> Self {
        Self {
            ledger,
            compiler,
            sink,
            clock,
            retry,
            window,
            limit: DEFAULT_FINISHED_LIMIT,
        }
    }

    /// Sets how many finished duels are requested from the ledger.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Runs one narrative pass. Publishes at most one narrative, and calls
    /// the sink at most once: a failed delivery fails the pass and is left to
    /// the next one.
    ///
    /// # Errors
    ///
    /// Returns the ledger's error if finished duels cannot be listed or the
    /// selected duel cannot be read, `DuelError::DuelNotFound` if it vanished,
    /// any compilation error, and the sink's error if publishing fails.
    #[instrument(skip(self))]
    pub async fn run_pass(&self) -> Result<NarrativeReport, DuelError> {
        let ledger = &self.ledger;
        let limit = self.limit;
        let summaries = retry_transient(&self.retry, "ledger.list_finished", move || {
            ledger.list_finished_duels(limit)
        })
        .await?;

        let mut report = NarrativeReport {
            considered: summaries.len(),
            ..NarrativeReport::default()
        };
        let Some(top) = selection::top_duel(&summaries, self.clock.as_ref(), self.window) else {
            debug!(considered = report.considered, "no duel qualifies for narration");
            return Ok(report);
        };
        let duel_id = top.id.clone();

        let id = &duel_id;
        let duel = retry_transient(&self.retry, "ledger.get_duel", move || ledger.get_duel(id))
            .await?
            .ok_or_else(|| DuelError::DuelNotFound(duel_id.clone()))?;

        let narrative = self.compiler.compile(&duel).await?;
        let text = narrative.render();

        call_once(&self.retry, "sink.publish", self.sink.publish(id, &text)).await?;

        report.posts = narrative.posts().len();
        info!(%duel_id, stake = %duel.stake.0, posts = report.posts, "narrative published");
        report.selected = Some(duel_id);
        Ok(report)
    }
}
