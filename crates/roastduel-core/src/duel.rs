//! Duel domain model as read from the authoritative ledger.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::content::ContentAddress;

/// Maximum number of turns in a duel. The last one is the final turn.
pub const MAX_TURNS: usize = 10;

/// Lowest damage a turn can deal.
pub const MIN_DAMAGE: u8 = 1;

/// Highest damage a turn can deal.
pub const MAX_DAMAGE: u8 = 15;

/// Ledger identifier of a duel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DuelId(String);

impl DuelId {
    /// Wraps a ledger identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DuelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a historical-figure persona, e.g. `JuliusCaesar`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FigureId(String);

impl FigureId {
    /// Wraps a figure identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FigureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The style a turn's roast is delivered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoastStyle {
    Witty,
    Brutal,
    Strategic,
    Mocking,
}

impl fmt::Display for RoastStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Witty => "Witty",
            Self::Brutal => "Brutal",
            Self::Strategic => "Strategic",
            Self::Mocking => "Mocking",
        };
        f.write_str(name)
    }
}

/// One of the two sides of a duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// The side that acts on turn `index`: even indices belong to side A.
    #[must_use]
    pub fn acting_on(index: usize) -> Self {
        if index % 2 == 0 { Self::A } else { Self::B }
    }

    /// The other side.
    #[must_use]
    pub fn opponent(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// Outcome recorded by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    SideA,
    SideB,
    Draw,
    Unresolved,
}

impl Winner {
    /// The winning side, if the outcome is decisive.
    #[must_use]
    pub fn side(self) -> Option<Side> {
        match self {
            Self::SideA => Some(Side::A),
            Self::SideB => Some(Side::B),
            Self::Draw | Self::Unresolved => None,
        }
    }

    /// Whether the ledger has settled the duel.
    #[must_use]
    pub fn is_resolved(self) -> bool {
        self != Self::Unresolved
    }
}

/// Amount wagered per side, in the token's smallest unit.
///
/// Encoded as a decimal string on the wire since it does not fit in a JSON
/// number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Stake(pub u128);

impl Stake {
    /// Formats the stake in whole token units given the token's decimals,
    /// trimming trailing fractional zeros.
    #[must_use]
    pub fn to_units(self, decimals: u32) -> String {
        let scale = 10u128.pow(decimals);
        let whole = self.0 / scale;
        let fraction = self.0 % scale;
        if fraction == 0 {
            return whole.to_string();
        }
        let digits = format!("{fraction:0width$}", width = decimals as usize);
        format!("{whole}.{}", digits.trim_end_matches('0'))
    }
}

impl Serialize for Stake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Stake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<u128>()
            .map(Stake)
            .map_err(serde::de::Error::custom)
    }
}

/// A player and the persona they fight as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Account of the player.
    pub player: String,
    /// Persona the player picked.
    pub figure: FigureId,
}

/// One side's attack. `content` stays unset until the generated roast has
/// been committed, and is never overwritten afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Damage dealt, expected in `[MIN_DAMAGE, MAX_DAMAGE]`.
    pub damage: u8,
    /// Style the roast is delivered in.
    pub style: RoastStyle,
    /// Locator of the generated roast.
    pub content: Option<ContentAddress>,
}

/// A duel as held by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duel {
    /// Ledger identifier.
    pub id: DuelId,
    /// Amount wagered per side.
    pub stake: Stake,
    /// The challenger, acting on even turns.
    pub side_a: Participant,
    /// The challenged, acting on odd turns.
    pub side_b: Participant,
    /// Turns ordered by index.
    pub turns: Vec<Turn>,
    /// Outcome recorded by the ledger.
    pub winner: Winner,
}

impl Duel {
    /// The participant fighting on `side`.
    #[must_use]
    pub fn participant(&self, side: Side) -> &Participant {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    /// Whether every turn has committed content.
    #[must_use]
    pub fn is_generation_complete(&self) -> bool {
        self.turns.iter().all(|turn| turn.content.is_some())
    }

    /// Whether the duel can be narrated.
    #[must_use]
    pub fn is_narrative_ready(&self) -> bool {
        self.winner.is_resolved() && self.is_generation_complete()
    }
}

/// Listing entry for a finished duel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelSummary {
    /// Ledger identifier.
    pub id: DuelId,
    /// Amount wagered per side.
    pub stake: Stake,
    /// Number of turns played.
    pub turn_count: usize,
    /// Outcome recorded by the ledger.
    pub winner: Winner,
    /// Time the last turn was taken.
    pub finished_at: DateTime<Utc>,
}

/// A committed turn whose roast has not been generated yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Duel the turn belongs to.
    pub duel_id: DuelId,
    /// Index of the turn within the duel.
    pub turn_index: usize,
    /// Persona delivering the roast.
    pub acting_figure: FigureId,
    /// Persona on the receiving end.
    pub target_figure: FigureId,
    /// Damage dealt, validated before generation.
    pub damage: u8,
    /// Style of the roast.
    pub style: RoastStyle,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(player: &str, figure: &str) -> Participant {
        Participant {
            player: player.to_owned(),
            figure: FigureId::new(figure),
        }
    }

    #[test]
    fn test_even_turns_belong_to_side_a() {
        for index in 0..MAX_TURNS {
            let expected = if index % 2 == 0 { Side::A } else { Side::B };
            assert_eq!(Side::acting_on(index), expected);
        }
        assert_eq!(Side::A.opponent(), Side::B);
    }

    #[test]
    fn test_winner_side() {
        assert_eq!(Winner::SideA.side(), Some(Side::A));
        assert_eq!(Winner::SideB.side(), Some(Side::B));
        assert_eq!(Winner::Draw.side(), None);
        assert!(Winner::Draw.is_resolved());
        assert!(!Winner::Unresolved.is_resolved());
    }

    #[test]
    fn test_stake_to_units() {
        assert_eq!(Stake(10u128.pow(24)).to_units(24), "1");
        assert_eq!(Stake(25 * 10u128.pow(23)).to_units(24), "2.5");
        assert_eq!(Stake(1).to_units(24), "0.000000000000000000000001");
        assert_eq!(Stake(0).to_units(24), "0");
    }

    #[test]
    fn test_stake_round_trips_as_decimal_string() {
        let stake = Stake(5 * 10u128.pow(24));
        let json = serde_json::to_string(&stake).unwrap();
        assert_eq!(json, "\"5000000000000000000000000\"");
        let back: Stake = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stake);
    }

    #[test]
    fn test_readiness_flags() {
        // Arrange
        let mut duel = Duel {
            id: DuelId::new("7"),
            stake: Stake(1),
            side_a: participant("alice.near", "SunTzu"),
            side_b: participant("bob.near", "Socrates"),
            turns: vec![Turn {
                damage: 4,
                style: RoastStyle::Witty,
                content: None,
            }],
            winner: Winner::SideA,
        };

        // Act / Assert
        assert!(!duel.is_generation_complete());
        assert!(!duel.is_narrative_ready());

        duel.turns[0].content = Some(ContentAddress::of(b"roast"));
        assert!(duel.is_generation_complete());
        assert!(duel.is_narrative_ready());

        duel.winner = Winner::Unresolved;
        assert!(!duel.is_narrative_ready());
        assert_eq!(duel.participant(Side::B).player, "bob.near");
    }
}
