//! Damage attribution by turn parity.

use roastduel_core::duel::{Duel, MAX_DAMAGE, MAX_TURNS, MIN_DAMAGE, Side, Winner};
use roastduel_core::error::DuelError;

/// Total damage dealt by each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DamageTally {
    /// Damage dealt on even turns.
    pub side_a: u32,
    /// Damage dealt on odd turns.
    pub side_b: u32,
}

/// How a resolved duel was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Margin {
    /// One side out-damaged the other by `diff`.
    Decisive { winner: Side, diff: u32 },
    /// Both sides dealt the same damage.
    Level,
}

impl DamageTally {
    /// Sums turn damage in index order, even turns to side A.
    #[must_use]
    pub fn of(duel: &Duel) -> Self {
        duel.turns
            .iter()
            .enumerate()
            .fold(Self::default(), |mut tally, (index, turn)| {
                match Side::acting_on(index) {
                    Side::A => tally.side_a += u32::from(turn.damage),
                    Side::B => tally.side_b += u32::from(turn.damage),
                }
                tally
            })
    }

    /// Damage dealt by `side`.
    #[must_use]
    pub fn total(&self, side: Side) -> u32 {
        match side {
            Side::A => self.side_a,
            Side::B => self.side_b,
        }
    }

    /// Checks the recorded winner against the totals.
    ///
    /// # Errors
    ///
    /// Returns `DuelError::Validation` for an unresolved duel, and
    /// `DuelError::InvariantViolation` when the recorded winner did not deal
    /// strictly more damage, or a draw has unequal totals.
    pub fn margin(&self, winner: Winner) -> Result<Margin, DuelError> {
        match winner {
            Winner::Unresolved => Err(DuelError::Validation(
                "duel has no resolved winner".into(),
            )),
            Winner::Draw if self.side_a == self.side_b => Ok(Margin::Level),
            Winner::Draw => Err(DuelError::InvariantViolation(format!(
                "duel recorded as a draw with totals {} and {}",
                self.side_a, self.side_b
            ))),
            Winner::SideA => self.decisive(Side::A),
            Winner::SideB => self.decisive(Side::B),
        }
    }

    fn decisive(&self, winner: Side) -> Result<Margin, DuelError> {
        let won = self.total(winner);
        let lost = self.total(winner.opponent());
        if won <= lost {
            return Err(DuelError::InvariantViolation(format!(
                "side {winner:?} recorded as winner with {won} damage against {lost}"
            )));
        }
        Ok(Margin::Decisive {
            winner,
            diff: won - lost,
        })
    }
}

/// Checks the shape of a finished duel and returns how it was decided.
///
/// # Errors
///
/// Returns `DuelError::Validation` if the duel is unresolved or a turn has
/// no content yet. Returns `DuelError::InvariantViolation` for more than
/// [`MAX_TURNS`] turns, damage outside `[1, 15]`, or a winner the totals
/// contradict.
pub fn check_finished(duel: &Duel) -> Result<Margin, DuelError> {
    if !duel.winner.is_resolved() {
        return Err(DuelError::Validation(format!(
            "duel {} has no resolved winner",
            duel.id
        )));
    }
    if duel.turns.len() > MAX_TURNS {
        return Err(DuelError::InvariantViolation(format!(
            "duel {} has {} turns",
            duel.id,
            duel.turns.len()
        )));
    }
    for (index, turn) in duel.turns.iter().enumerate() {
        if !(MIN_DAMAGE..=MAX_DAMAGE).contains(&turn.damage) {
            return Err(DuelError::InvariantViolation(format!(
                "duel {} turn {index} has damage {}",
                duel.id, turn.damage
            )));
        }
        if turn.content.is_none() {
            return Err(DuelError::Validation(format!(
                "duel {} turn {index} has no content yet",
                duel.id
            )));
        }
    }
    DamageTally::of(duel).margin(duel.winner)
}
