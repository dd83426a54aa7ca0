//! The fixed prompt template sent to the generation service.

use roastduel_core::duel::{GenerationRequest, RoastStyle};
use roastduel_core::figures::display_name;

use super::severity::SeverityTier;

/// Upper bound on roast length requested from the generator.
pub const MAX_ROAST_CHARS: usize = 100;

/// Everything the prompt embeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoastPrompt {
    /// Display name of the persona delivering the roast.
    pub acting_figure: String,
    /// Display name of the persona on the receiving end.
    pub target_figure: String,
    /// Style of the roast.
    pub style: RoastStyle,
    /// Intensity derived from the turn's damage.
    pub severity: SeverityTier,
}

impl RoastPrompt {
    /// Builds the prompt for an already classified request.
    #[must_use]
    pub fn for_request(request: &GenerationRequest, severity: SeverityTier) -> Self {
        Self {
            acting_figure: display_name(&request.acting_figure).to_owned(),
            target_figure: display_name(&request.target_figure).to_owned(),
            style: request.style,
            severity,
        }
    }

    /// Renders the prompt text. Identical inputs render identical text.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "Generate a roast from {acting} directed at {target}.\n\
             Keep it to a single sentence under {MAX_ROAST_CHARS} characters, sharp, \
             and historically themed.\n\
             Style of the roast: {style}.\n\
             Severity of the roast: {name} ({description})\n",
            acting = self.acting_figure,
            target = self.target_figure,
            style = self.style,
            name = self.severity.name(),
            description = self.severity.description(),
        )
    }
}
