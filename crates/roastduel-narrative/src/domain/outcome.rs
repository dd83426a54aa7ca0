//! Outcome ladder: how the margin of victory is described.

use serde::Serialize;

/// Grade of a decisive victory by damage margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTier {
    /// Margin up to 30.
    Narrow,
    /// Margin 31 to 60.
    Contested,
    /// Margin 61 to 90.
    Slipping,
    /// Margin 91 to 120.
    Commanding,
    /// Margin above 120.
    Annihilation,
}

impl OutcomeTier {
    /// Grades a margin. Boundaries are inclusive upper bounds.
    #[must_use]
    pub fn classify(diff: u32) -> Self {
        match diff {
            0..=30 => Self::Narrow,
            31..=60 => Self::Contested,
            61..=90 => Self::Slipping,
            91..=120 => Self::Commanding,
            _ => Self::Annihilation,
        }
    }

    /// The canned summary for this grade, naming the winning figure where
    /// the template calls for it.
    #[must_use]
    pub fn summary(self, winner_figure: &str) -> String {
        match self {
            Self::Narrow => format!(
                "😅 {winner_figure} barely made it through, and both duelists walked away \
                 with their pride (mostly) intact."
            ),
            Self::Contested => "⚔️ Sharp words were thrown, but neither side fully dominated. \
                                The crowd wants a rematch."
                .to_owned(),
            Self::Slipping => "🔥 One duelist started losing ground fast, but they held \
                               their own until the end."
                .to_owned(),
            Self::Commanding => format!(
                "⚡ The arena shook as {winner_figure}'s insults landed with precision. \
                 This one will be talked about for a while."
            ),
            Self::Annihilation => format!(
                "💀 There was no mercy. {winner_figure} sent their opponent straight to \
                 the history books (for the wrong reasons)."
            ),
        }
    }
}

/// Summary for a duel that ended level.
#[must_use]
pub fn draw_summary(figure_a: &str, figure_b: &str) -> String {
    format!(
        "🤝 Neither {figure_a} nor {figure_b} gave an inch. The judges could not \
         separate them."
    )
}
