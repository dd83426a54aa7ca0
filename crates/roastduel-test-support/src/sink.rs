//! `NarrativeSink` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use roastduel_core::duel::DuelId;
use roastduel_core::error::DuelError;
use roastduel_core::ports::NarrativeSink;

/// A sink that records every published narrative.
#[derive(Debug, Default)]
pub struct RecordingSink {
    published: Mutex<Vec<(DuelId, String)>>,
    lose_acks: bool,
}

impl RecordingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that records each narrative and then reports the delivery as
    /// failed, like a post that landed but whose acknowledgement was lost.
    #[must_use]
    pub fn losing_acks() -> Self {
        Self {
            lose_acks: true,
            ..Self::default()
        }
    }

    /// Returns a snapshot of everything published, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn published(&self) -> Vec<(DuelId, String)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl NarrativeSink for RecordingSink {
    async fn publish(&self, duel_id: &DuelId, narrative: &str) -> Result<(), DuelError> {
        self.published
            .lock()
            .unwrap()
            .push((duel_id.clone(), narrative.to_owned()));
        if self.lose_acks {
            return Err(DuelError::Unavailable("acknowledgement lost".into()));
        }
        Ok(())
    }
}

/// A sink that refuses every narrative.
#[derive(Debug)]
pub struct FailingSink;

#[async_trait]
impl NarrativeSink for FailingSink {
    async fn publish(&self, _duel_id: &DuelId, _narrative: &str) -> Result<(), DuelError> {
        Err(DuelError::Unavailable("sink offline".into()))
    }
}
