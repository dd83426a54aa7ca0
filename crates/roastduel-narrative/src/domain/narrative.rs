//! Narrative assembly for a finished duel.

use roastduel_core::duel::{Duel, Side};
use roastduel_core::error::DuelError;
use roastduel_core::figures::display_name;
use serde::Serialize;

use super::outcome::{OutcomeTier, draw_summary};
use super::tally::Margin;

/// Symbol of the token duels are staked in.
pub const TOKEN_SYMBOL: &str = "$ROASTI";

/// Decimal places of the staked token.
pub const TOKEN_DECIMALS: u32 = 24;

/// The complete, publishable account of one duel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Narrative {
    /// Opening post: both figures, both players, the stake.
    pub intro: String,
    /// One entry per turn, in index order.
    pub turn_lines: Vec<String>,
    /// Graded description of the outcome.
    pub outcome_summary: String,
    /// Victory (or split pot) line.
    pub closing: String,
}

impl Narrative {
    /// Assembles the narrative from a checked duel and its resolved roasts.
    ///
    /// `roasts` holds the text of each turn in index order.
    ///
    /// # Errors
    ///
    /// Returns `DuelError::InvariantViolation` if the number of roasts does
    /// not match the number of turns.
    pub fn assemble(duel: &Duel, margin: Margin, roasts: &[String]) -> Result<Self, DuelError> {
        if roasts.len() != duel.turns.len() {
            return Err(DuelError::InvariantViolation(format!(
                "duel {} has {} turns but {} roasts were resolved",
                duel.id,
                duel.turns.len(),
                roasts.len()
            )));
        }

        let figure_a = display_name(&duel.side_a.figure);
        let figure_b = display_name(&duel.side_b.figure);
        let intro = format!(
            "🔥 Welcome to the arena! 🔥\n\
             Today, we have a legendary face-off between {figure_a} and {figure_b}!\n\
             👤 Players: {player_a} vs. {player_b}\n\
             💰 Stake: {stake} {TOKEN_SYMBOL}\n\
             Let the roast battle begin! ⚔️",
            player_a = duel.side_a.player,
            player_b = duel.side_b.player,
            stake = duel.stake.to_units(TOKEN_DECIMALS),
        );

        let last = duel.turns.len().saturating_sub(1);
        let turn_lines = duel
            .turns
            .iter()
            .zip(roasts)
            .enumerate()
            .map(|(index, (turn, roast))| {
                let heading = if index == last {
                    "🔥 Final Turn:".to_owned()
                } else {
                    format!("📜 Turn {}:", index + 1)
                };
                let figure = match Side::acting_on(index) {
                    Side::A => figure_a,
                    Side::B => figure_b,
                };
                format!(
                    "{heading}\n\
                     ➡️ {figure} delivers a {style} Roast (Damage: {damage})\n\
                     🗣️ {roast}",
                    style = turn.style,
                    damage = turn.damage,
                )
            })
            .collect();

        let (outcome_summary, closing) = match margin {
            Margin::Decisive { winner, diff } => {
                let participant = duel.participant(winner);
                (
                    OutcomeTier::classify(diff).summary(display_name(&participant.figure)),
                    format!(
                        "🏆 {} wins the roast battle and takes the pot!",
                        participant.player
                    ),
                )
            }
            Margin::Level => (
                draw_summary(figure_a, figure_b),
                format!(
                    "🤝 {} and {} share the honours and split the pot!",
                    duel.side_a.player, duel.side_b.player
                ),
            ),
        };

        Ok(Self {
            intro,
            turn_lines,
            outcome_summary,
            closing,
        })
    }

    /// The narrative as a thread of posts: intro, one per turn, then the
    /// summary together with the closing line.
    #[must_use]
    pub fn posts(&self) -> Vec<String> {
        let mut posts = Vec::with_capacity(self.turn_lines.len() + 2);
        posts.push(self.intro.clone());
        posts.extend(self.turn_lines.iter().cloned());
        posts.push(format!("{}\n{}", self.outcome_summary, self.closing));
        posts
    }

    /// The narrative as one string, posts separated by blank lines.
    #[must_use]
    pub fn render(&self) -> String {
        self.posts().join("\n\n")
    }
}
