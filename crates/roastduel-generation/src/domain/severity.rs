//! Per-turn severity tiers.

use std::fmt;

use roastduel_core::duel::{MAX_DAMAGE, MIN_DAMAGE};
use roastduel_core::error::DuelError;
use serde::Serialize;

/// Intensity of a single roast, ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SeverityTier {
    Mild,
    Sharp,
    Devastating,
    Wrecking,
    Humiliating,
    LegacyRuined,
}

impl SeverityTier {
    /// Classifies a turn's damage.
    ///
    /// # Errors
    ///
    /// Returns `DuelError::Validation` if `damage` is outside `[1, 15]`.
    pub fn classify(damage: u8) -> Result<Self, DuelError> {
        match damage {
            1..=3 => Ok(Self::Mild),
            4..=6 => Ok(Self::Sharp),
            7..=9 => Ok(Self::Devastating),
            10 => Ok(Self::Wrecking),
            11..=14 => Ok(Self::Humiliating),
            15 => Ok(Self::LegacyRuined),
            _ => Err(DuelError::Validation(format!(
                "damage {damage} outside [{MIN_DAMAGE}, {MAX_DAMAGE}]"
            ))),
        }
    }

    /// Short tier name used in prompts.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Mild => "Mild Jibe",
            Self::Sharp => "Sharp Insult",
            Self::Devastating => "Devastating Quip",
            Self::Wrecking => "Wrecking Blow",
            Self::Humiliating => "Humiliation",
            Self::LegacyRuined => "Legacy Ruined",
        }
    }

    /// What a roast of this tier should feel like.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Mild => "A light, embarrassing remark, barely scratching the opponent.",
            Self::Sharp => "A noticeable burn, but nothing they can't recover from.",
            Self::Devastating => "A serious verbal strike, leaving them reeling.",
            Self::Wrecking => "A roast so brutal it shakes their confidence.",
            Self::Humiliating => "A career-ending insult that will be remembered.",
            Self::LegacyRuined => "A roast so powerful it rewrites history itself.",
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roastduel_core::error::ErrorKind;

    #[test]
    fn test_every_valid_damage_maps_to_its_tier() {
        let expected = [
            (1, SeverityTier::Mild),
            (2, SeverityTier::Mild),
            (3, SeverityTier::Mild),
            (4, SeverityTier::Sharp),
            (5, SeverityTier::Sharp),
            (6, SeverityTier::Sharp),
            (7, SeverityTier::Devastating),
            (8, SeverityTier::Devastating),
            (9, SeverityTier::Devastating),
            (10, SeverityTier::Wrecking),
            (11, SeverityTier::Humiliating),
            (12, SeverityTier::Humiliating),
            (13, SeverityTier::Humiliating),
            (14, SeverityTier::Humiliating),
            (15, SeverityTier::LegacyRuined),
        ];

        for (damage, tier) in expected {
            assert_eq!(SeverityTier::classify(damage).unwrap(), tier, "damage {damage}");
        }
    }

    #[test]
    fn test_out_of_range_damage_is_a_validation_error() {
        for damage in [0, 16, 99, u8::MAX] {
            let err = SeverityTier::classify(damage).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "damage {damage}");
        }
    }

    #[test]
    fn test_tiers_are_ordered_by_intensity() {
        assert!(SeverityTier::Mild < SeverityTier::Sharp);
        assert!(SeverityTier::Wrecking < SeverityTier::Humiliating);
        assert!(SeverityTier::Humiliating < SeverityTier::LegacyRuined);
    }
}
