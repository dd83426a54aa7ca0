//! Content synthesizer: one generation call per roast.

use std::sync::Arc;

use roastduel_core::error::DuelError;
use roastduel_core::ports::RoastGenerator;
use tracing::{debug, instrument};

use crate::domain::prompt::RoastPrompt;

/// Turns a prompt into roast text. Never retries and never substitutes
/// placeholder text; retry policy belongs to the caller.
#[derive(Clone)]
pub struct RoastSynthesizer {
    generator: Arc<dyn RoastGenerator>,
}

impl RoastSynthesizer {
    /// Creates a synthesizer backed by `generator`.
    #[must_use]
    pub fn new(generator: Arc<dyn RoastGenerator>) -> Self {
        Self { generator }
    }

    /// Calls the generator once and returns the trimmed response.
    ///
    /// # Errors
    ///
    /// Propagates the generator's error unchanged. Returns
    /// `DuelError::MalformedResponse` if the response is blank.
    #[instrument(skip_all, fields(severity = %prompt.severity, style = %prompt.style))]
    pub async fn synthesize(&self, prompt: &RoastPrompt) -> Result<String, DuelError> {
        let response = self.generator.complete(&prompt.render()).await?;
        let roast = response.trim();
        if roast.is_empty() {
            return Err(DuelError::MalformedResponse(
                "generator returned an empty completion".into(),
            ));
        }
        debug!(chars = roast.chars().count(), "roast synthesized");
        Ok(roast.to_owned())
    }
}
