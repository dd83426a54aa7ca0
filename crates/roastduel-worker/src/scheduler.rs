//! Pass scheduling.
//!
//! Each pass kind owns a [`PassSlot`]: a trigger that finds the slot busy is
//! skipped rather than queued, whether it comes from the timer or from the
//! API. Every run gets a fresh `pass_id` and its record replaces the slot's
//! last record. A failing pass is logged and recorded; it never stops the
//! timer.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use roastduel_core::clock::Clock;
use roastduel_core::error::{DuelError, ErrorKind};
use roastduel_generation::application::coordinator::{GenerationCoordinator, GenerationReport};
use roastduel_narrative::application::publisher::{NarrativePass, NarrativeReport};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

/// The two independently scheduled passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassKind {
    Generation,
    Narrative,
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generation => f.write_str("generation"),
            Self::Narrative => f.write_str("narrative"),
        }
    }
}

/// How a pass ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PassOutcome<R> {
    /// The pass ran to the end; item failures are inside the report.
    Completed {
        /// What the pass did.
        report: R,
    },
    /// The pass was aborted.
    Failed {
        /// Kind of the aborting error.
        kind: ErrorKind,
        /// Human-readable error.
        error: String,
    },
}

/// One finished pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassRecord<R> {
    /// Correlates every log line of the pass.
    pub pass_id: Uuid,
    /// Which pass ran.
    pub kind: PassKind,
    /// When the pass started.
    pub started_at: DateTime<Utc>,
    /// When the pass ended.
    pub finished_at: DateTime<Utc>,
    /// How it ended.
    pub outcome: PassOutcome<R>,
}

/// Returned when a pass is triggered while one of its kind is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassBusy(pub PassKind);

/// Overlap guard and last record for one pass kind.
#[derive(Debug)]
pub struct PassSlot<R> {
    kind: PassKind,
    running: tokio::sync::Mutex<()>,
    last: Mutex<Option<PassRecord<R>>>,
}

impl<R: Clone> PassSlot<R> {
    /// Creates an idle slot.
    #[must_use]
    pub fn new(kind: PassKind) -> Self {
        Self {
            kind,
            running: tokio::sync::Mutex::new(()),
            last: Mutex::new(None),
        }
    }

    /// The record of the most recent finished pass.
    #[must_use]
    pub fn last(&self) -> Option<PassRecord<R>> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Runs `pass` unless a pass of this kind is already running.
    ///
    /// # Errors
    ///
    /// Returns [`PassBusy`] without running anything if the slot is taken.
    pub async fn run<F, Fut>(&self, clock: &dyn Clock, pass: F) -> Result<PassRecord<R>, PassBusy>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, DuelError>>,
    {
        let Ok(_running) = self.running.try_lock() else {
            info!(kind = %self.kind, "pass still running, trigger skipped");
            return Err(PassBusy(self.kind));
        };

        let pass_id = Uuid::now_v7();
        let span = info_span!("pass", %pass_id, kind = %self.kind);
        let started_at = clock.now();
        let result = pass().instrument(span.clone()).await;
        let finished_at = clock.now();

        let outcome = span.in_scope(|| match result {
            Ok(report) => {
                info!("pass completed");
                PassOutcome::Completed { report }
            }
            Err(err) => {
                let kind = err.kind();
                if kind == ErrorKind::Invariant {
                    error!(error = %err, "pass aborted on inconsistent ledger state");
                } else {
                    warn!(error = %err, ?kind, "pass failed");
                }
                PassOutcome::Failed {
                    kind,
                    error: err.to_string(),
                }
            }
        });

        let record = PassRecord {
            pass_id,
            kind: self.kind,
            started_at,
            finished_at,
            outcome,
        };
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(record.clone());
        Ok(record)
    }
}

/// Both passes with their slots.
pub struct Passes {
    generation: GenerationCoordinator,
    narrative: NarrativePass,
    clock: Arc<dyn Clock>,
    generation_slot: PassSlot<GenerationReport>,
    narrative_slot: PassSlot<NarrativeReport>,
}

impl Passes {
    /// Wraps the two passes.
    #[must_use]
    pub fn new(
        generation: GenerationCoordinator,
        narrative: NarrativePass,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            generation,
            narrative,
            clock,
            generation_slot: PassSlot::new(PassKind::Generation),
            narrative_slot: PassSlot::new(PassKind::Narrative),
        }
    }

    /// Runs a generation pass now.
    ///
    /// # Errors
    ///
    /// Returns [`PassBusy`] if a generation pass is already running.
    pub async fn run_generation(&self) -> Result<PassRecord<GenerationReport>, PassBusy> {
        self.generation_slot
            .run(self.clock.as_ref(), || self.generation.run_pass())
            .await
    }

    /// Runs a narrative pass now.
    ///
    /// # Errors
    ///
    /// Returns [`PassBusy`] if a narrative pass is already running.
    pub async fn run_narrative(&self) -> Result<PassRecord<NarrativeReport>, PassBusy> {
        self.narrative_slot
            .run(self.clock.as_ref(), || self.narrative.run_pass())
            .await
    }

    /// The most recent generation pass.
    #[must_use]
    pub fn last_generation(&self) -> Option<PassRecord<GenerationReport>> {
        self.generation_slot.last()
    }

    /// The most recent narrative pass.
    #[must_use]
    pub fn last_narrative(&self) -> Option<PassRecord<NarrativeReport>> {
        self.narrative_slot.last()
    }
}

/// Timer settings for [`spawn`].
#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    /// Period of the generation pass. The first run is immediate.
    pub generation_every: Duration,
    /// Period of the narrative pass. The first run waits one period.
    pub narrative_every: Duration,
}

/// Starts both timers. Ticks missed while a pass overruns are dropped.
#[must_use]
pub fn spawn(passes: &Arc<Passes>, schedule: Schedule) -> Vec<JoinHandle<()>> {
    let now = Instant::now();

    let generation = Arc::clone(passes);
    let generation_timer = tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(now, schedule.generation_every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let _ = generation.run_generation().await;
        }
    });

    let narrative = Arc::clone(passes);
    let narrative_timer = tokio::spawn(async move {
        let mut interval =
            tokio::time::interval_at(now + schedule.narrative_every, schedule.narrative_every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let _ = narrative.run_narrative().await;
        }
    });

    info!(
        generation_every_secs = schedule.generation_every.as_secs(),
        narrative_every_secs = schedule.narrative_every.as_secs(),
        "scheduler started"
    );
    vec![generation_timer, narrative_timer]
}
