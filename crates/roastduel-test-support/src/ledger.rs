//! In-memory `DuelLedger` implementations for tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roastduel_core::content::ContentAddress;
use roastduel_core::duel::{Duel, DuelId, DuelSummary, GenerationRequest, Side};
use roastduel_core::error::DuelError;
use roastduel_core::ports::DuelLedger;

#[derive(Debug, Clone)]
struct Entry {
    duel: Duel,
    finished_at: Option<DateTime<Utc>>,
}

/// A ledger that keeps duels in memory and enforces write-once turn content
/// the way the authoritative state does. Every commit attempt is recorded.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    duels: Mutex<BTreeMap<DuelId, Entry>>,
    commit_attempts: Mutex<Vec<(DuelId, usize, ContentAddress)>>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a duel that has not finished yet.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn insert_duel(&self, duel: Duel) {
        self.duels.lock().unwrap().insert(
            duel.id.clone(),
            Entry {
                duel,
                finished_at: None,
            },
        );
    }

    /// Stores a duel whose last turn was taken at `finished_at`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn insert_finished(&self, duel: Duel, finished_at: DateTime<Utc>) {
        self.duels.lock().unwrap().insert(
            duel.id.clone(),
            Entry {
                duel,
                finished_at: Some(finished_at),
            },
        );
    }

    /// Returns a snapshot of a stored duel.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn duel(&self, duel_id: &DuelId) -> Option<Duel> {
        self.duels
            .lock()
            .unwrap()
            .get(duel_id)
            .map(|entry| entry.duel.clone())
    }

    /// Returns every commit attempt, accepted or not, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn commit_attempts(&self) -> Vec<(DuelId, usize, ContentAddress)> {
        self.commit_attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl DuelLedger for InMemoryLedger {
    async fn list_outstanding_generation_requests(
        &self,
    ) -> Result<Vec<GenerationRequest>, DuelError> {
        let duels = self.duels.lock().unwrap();
        let requests = duels
            .values()
            .flat_map(|entry| {
                let duel = &entry.duel;
                duel.turns
                    .iter()
                    .enumerate()
                    .filter(|(_, turn)| turn.content.is_none())
                    .map(move |(index, turn)| {
                        let acting = Side::acting_on(index);
                        GenerationRequest {
                            duel_id: duel.id.clone(),
                            turn_index: index,
                            acting_figure: duel.participant(acting).figure.clone(),
                            target_figure: duel.participant(acting.opponent()).figure.clone(),
                            damage: turn.damage,
                            style: turn.style,
                        }
                    })
            })
            .collect();
        Ok(requests)
    }

    async fn commit_turn_content(
        &self,
        duel_id: &DuelId,
        turn_index: usize,
        address: &ContentAddress,
    ) -> Result<(), DuelError> {
        self.commit_attempts
            .lock()
            .unwrap()
            .push((duel_id.clone(), turn_index, address.clone()));

        let mut duels = self.duels.lock().unwrap();
        let entry = duels
            .get_mut(duel_id)
            .ok_or_else(|| DuelError::DuelNotFound(duel_id.clone()))?;
        let rejected = |reason: &str| DuelError::CommitRejected {
            duel_id: duel_id.clone(),
            turn_index,
            reason: reason.to_owned(),
        };
        let turn = entry
            .duel
            .turns
            .get_mut(turn_index)
            .ok_or_else(|| rejected("turn has not been taken"))?;

        match &turn.content {
            Some(existing) if existing == address => Ok(()),
            Some(_) => Err(rejected("roast already set")),
            None => {
                turn.content = Some(address.clone());
                Ok(())
            }
        }
    }

    async fn get_duel(&self, duel_id: &DuelId) -> Result<Option<Duel>, DuelError> {
        Ok(self.duel(duel_id))
    }

    async fn list_finished_duels(&self, limit: usize) -> Result<Vec<DuelSummary>, DuelError> {
        let duels = self.duels.lock().unwrap();
        let mut finished: Vec<DuelSummary> = duels
            .values()
            .filter(|entry| entry.duel.winner.is_resolved())
            .filter_map(|entry| {
                entry.finished_at.map(|finished_at| DuelSummary {
                    id: entry.duel.id.clone(),
                    stake: entry.duel.stake,
                    turn_count: entry.duel.turns.len(),
                    winner: entry.duel.winner,
                    finished_at,
                })
            })
            .collect();
        finished.sort_by(|a, b| b.finished_at.cmp(&a.finished_at));
        finished.truncate(limit);
        Ok(finished)
    }
}

/// A ledger whose every call fails with an infrastructure error.
#[derive(Debug)]
pub struct FailingLedger;

#[async_trait]
impl DuelLedger for FailingLedger {
    async fn list_outstanding_generation_requests(
        &self,
    ) -> Result<Vec<GenerationRequest>, DuelError> {
        Err(DuelError::Infrastructure("connection refused".into()))
    }

    async fn commit_turn_content(
        &self,
        _duel_id: &DuelId,
        _turn_index: usize,
        _address: &ContentAddress,
    ) -> Result<(), DuelError> {
        Err(DuelError::Infrastructure("connection refused".into()))
    }

    async fn get_duel(&self, _duel_id: &DuelId) -> Result<Option<Duel>, DuelError> {
        Err(DuelError::Infrastructure("connection refused".into()))
    }

    async fn list_finished_duels(&self, _limit: usize) -> Result<Vec<DuelSummary>, DuelError> {
        Err(DuelError::Infrastructure("connection refused".into()))
    }
}
