//! Validation and batching of outstanding generation requests.
//!
//! Item-level problems (bad damage, missing identifiers) fail a single
//! request. Problems that can only come from corrupt ledger state (duplicate
//! slots, indices past the final turn, figures contradicting turn parity)
//! fail the whole pass.

use std::collections::BTreeMap;

use roastduel_core::duel::{DuelId, FigureId, GenerationRequest, MAX_TURNS, Side};
use roastduel_core::error::DuelError;

use super::severity::SeverityTier;

/// Validates a single request and classifies its damage.
///
/// # Errors
///
/// Returns `DuelError::Validation` for an empty identifier or damage outside
/// `[1, 15]`.
pub fn validate(request: &GenerationRequest) -> Result<SeverityTier, DuelError> {
    if request.duel_id.as_str().trim().is_empty() {
        return Err(DuelError::Validation("request has an empty duel id".into()));
    }
    if request.acting_figure.as_str().trim().is_empty()
        || request.target_figure.as_str().trim().is_empty()
    {
        return Err(DuelError::Validation(format!(
            "duel {} turn {} is missing a figure",
            request.duel_id, request.turn_index
        )));
    }
    SeverityTier::classify(request.damage)
}

/// Groups requests by duel, each group sorted by turn index.
///
/// # Errors
///
/// Returns `DuelError::InvariantViolation` if a slot appears twice, an index
/// lies past the final turn, or a duel's figures contradict turn parity.
pub fn plan_batches(
    requests: Vec<GenerationRequest>,
) -> Result<Vec<Vec<GenerationRequest>>, DuelError> {
    let mut by_duel: BTreeMap<DuelId, Vec<GenerationRequest>> = BTreeMap::new();
    for request in requests {
        if request.turn_index >= MAX_TURNS {
            return Err(DuelError::InvariantViolation(format!(
                "duel {} has outstanding turn {} past the final turn",
                request.duel_id, request.turn_index
            )));
        }
        by_duel
            .entry(request.duel_id.clone())
            .or_default()
            .push(request);
    }

    for (duel_id, batch) in &mut by_duel {
        batch.sort_by_key(|request| request.turn_index);
        if let Some(pair) = batch
            .windows(2)
            .find(|pair| pair[0].turn_index == pair[1].turn_index)
        {
            return Err(DuelError::InvariantViolation(format!(
                "duel {duel_id} lists turn {} twice",
                pair[0].turn_index
            )));
        }
        check_parity(duel_id, batch)?;
    }

    Ok(by_duel.into_values().collect())
}

/// Every request of one duel must agree on which figure fights for which
/// side, with side A acting on even turns.
fn check_parity(duel_id: &DuelId, batch: &[GenerationRequest]) -> Result<(), DuelError> {
    let mut side_a: Option<&FigureId> = None;
    let mut side_b: Option<&FigureId> = None;

    for request in batch {
        let acting = Side::acting_on(request.turn_index);
        let assignments = [
            (acting, &request.acting_figure),
            (acting.opponent(), &request.target_figure),
        ];
        for (side, figure) in assignments {
            let slot = match side {
                Side::A => &mut side_a,
                Side::B => &mut side_b,
            };
            match *slot {
                Some(known) if known != figure => {
                    return Err(DuelError::InvariantViolation(format!(
                        "duel {duel_id} turn {} puts {figure} on side {side:?}, \
                         which earlier turns gave to {known}",
                        request.turn_index
                    )));
                }
                Some(_) => {}
                None => *slot = Some(figure),
            }
        }
    }
    Ok(())
}
