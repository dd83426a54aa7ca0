//! Duel fixtures.

use roastduel_core::content::ContentAddress;
use roastduel_core::duel::{Duel, DuelId, FigureId, Participant, RoastStyle, Stake, Turn, Winner};

const STYLES: [RoastStyle; 4] = [
    RoastStyle::Witty,
    RoastStyle::Brutal,
    RoastStyle::Strategic,
    RoastStyle::Mocking,
];

/// A participant fighting as `figure`.
#[must_use]
pub fn participant(player: &str, figure: &str) -> Participant {
    Participant {
        player: player.to_owned(),
        figure: FigureId::new(figure),
    }
}

/// Julius Caesar (`alice.near`) against Mark Twain (`bob.near`), staking one
/// whole token, with one turn per entry of `damages` and no content yet.
/// Styles cycle through Witty, Brutal, Strategic, Mocking.
#[must_use]
pub fn duel(id: &str, damages: &[u8], winner: Winner) -> Duel {
    Duel {
        id: DuelId::new(id),
        stake: Stake(10u128.pow(24)),
        side_a: participant("alice.near", "JuliusCaesar"),
        side_b: participant("bob.near", "MarkTwain"),
        turns: damages
            .iter()
            .enumerate()
            .map(|(index, &damage)| Turn {
                damage,
                style: STYLES[index % STYLES.len()],
                content: None,
            })
            .collect(),
        winner,
    }
}

/// Like [`duel`], with every turn's content set to the given addresses.
///
/// # Panics
///
/// Panics if `addresses` and `damages` differ in length.
#[must_use]
pub fn duel_with_content(
    id: &str,
    damages: &[u8],
    addresses: &[ContentAddress],
    winner: Winner,
) -> Duel {
    assert_eq!(damages.len(), addresses.len(), "one address per turn");
    let mut duel = duel(id, damages, winner);
    for (turn, address) in duel.turns.iter_mut().zip(addresses) {
        turn.content = Some(address.clone());
    }
    duel
}
