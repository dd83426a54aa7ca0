//! Choosing which finished duel to narrate.

use chrono::Duration;
use roastduel_core::clock::Clock;
use roastduel_core::duel::{DuelSummary, MAX_TURNS};

/// Picks the duel worth narrating: a resolved outcome (a winner or a draw),
/// all turns played, finished within `window` of now, and the highest stake
/// among those. Ties go to the summary listed first.
#[must_use]
pub fn top_duel<'a>(
    summaries: &'a [DuelSummary],
    clock: &dyn Clock,
    window: Duration,
) -> Option<&'a DuelSummary> {
    summaries
        .iter()
        .filter(|summary| summary.winner.is_resolved())
        .filter(|summary| summary.turn_count == MAX_TURNS)
        .filter(|summary| clock.is_within(summary.finished_at, window))
        .fold(None, |best: Option<&DuelSummary>, summary| match best {
            Some(current) if current.stake >= summary.stake => Some(current),
            _ => Some(summary),
        })
}
