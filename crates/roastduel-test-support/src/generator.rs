//! `RoastGenerator` implementations with canned output.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use roastduel_core::error::DuelError;
use roastduel_core::ports::RoastGenerator;

/// A generator that replays a script of responses in call order, then falls
/// back to a fixed response. Records every prompt it receives.
#[derive(Debug)]
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<String, DuelError>>>,
    fallback: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// Creates a generator that always answers `fallback`.
    #[must_use]
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: fallback.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queues `response` ahead of the fallback.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn then(self, response: Result<String, DuelError>) -> Self {
        self.script.lock().unwrap().push_back(response);
        self
    }

    /// Returns a snapshot of every prompt received.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoastGenerator for ScriptedGenerator {
    async fn complete(&self, prompt: &str) -> Result<String, DuelError> {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}

/// A generator that derives each response from the prompt, for tests where
/// items run concurrently and call order is not fixed.
pub struct FnGenerator<F> {
    respond: F,
}

impl<F> FnGenerator<F>
where
    F: Fn(&str) -> Result<String, DuelError> + Send + Sync,
{
    /// Wraps `respond`.
    #[must_use]
    pub fn new(respond: F) -> Self {
        Self { respond }
    }
}

#[async_trait]
impl<F> RoastGenerator for FnGenerator<F>
where
    F: Fn(&str) -> Result<String, DuelError> + Send + Sync,
{
    async fn complete(&self, prompt: &str) -> Result<String, DuelError> {
        (self.respond)(prompt)
    }
}
