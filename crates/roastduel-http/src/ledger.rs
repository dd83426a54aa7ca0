//! `DuelLedger` over the duel-state gateway's JSON API.
//!
//! | call | request |
//! |---|---|
//! | outstanding requests | `GET {base}/roast-queue` |
//! | one duel | `GET {base}/duels/{id}` |
//! | finished duels | `GET {base}/duels/finished?limit={n}` |
//! | commit | `PUT {base}/duels/{id}/turns/{index}/roast` |

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use roastduel_core::content::ContentAddress;
use roastduel_core::duel::{
    Duel, DuelId, DuelSummary, FigureId, GenerationRequest, Participant, RoastStyle, Stake, Turn,
    Winner,
};
use roastduel_core::error::DuelError;
use roastduel_core::ports::DuelLedger;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::status::{error_from_response, map_send_error};

/// One entry of the roast queue.
#[derive(Debug, Deserialize)]
struct RoastIndex {
    duel_id: String,
    turn: usize,
    current_figure: String,
    next_figure: String,
    damage: u8,
    style: RoastStyle,
}

impl From<RoastIndex> for GenerationRequest {
    fn from(index: RoastIndex) -> Self {
        Self {
            duel_id: DuelId::new(index.duel_id),
            turn_index: index.turn,
            acting_figure: FigureId::new(index.current_figure),
            target_figure: FigureId::new(index.next_figure),
            damage: index.damage,
            style: index.style,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
enum WireWinner {
    PlayerA,
    PlayerB,
    Draw,
}

fn winner_from_wire(winner: Option<WireWinner>) -> Winner {
    match winner {
        Some(WireWinner::PlayerA) => Winner::SideA,
        Some(WireWinner::PlayerB) => Winner::SideB,
        Some(WireWinner::Draw) => Winner::Draw,
        None => Winner::Unresolved,
    }
}

#[derive(Debug, Deserialize)]
struct WireTurn {
    damage: u8,
    style: RoastStyle,
    #[serde(default)]
    roast_cid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireDuel {
    duel_id: String,
    stake: Stake,
    player_a: String,
    figure_a: String,
    player_b: String,
    figure_b: String,
    turns: Vec<WireTurn>,
    #[serde(default)]
    winner: Option<WireWinner>,
}

impl From<WireDuel> for Duel {
    fn from(wire: WireDuel) -> Self {
        Self {
            id: DuelId::new(wire.duel_id),
            stake: wire.stake,
            side_a: Participant {
                player: wire.player_a,
                figure: FigureId::new(wire.figure_a),
            },
            side_b: Participant {
                player: wire.player_b,
                figure: FigureId::new(wire.figure_b),
            },
            turns: wire
                .turns
                .into_iter()
                .map(|turn| Turn {
                    damage: turn.damage,
                    style: turn.style,
                    // The gateway reports an unset roast as an empty string.
                    content: turn
                        .roast_cid
                        .filter(|cid| !cid.is_empty())
                        .map(ContentAddress::new),
                })
                .collect(),
            winner: winner_from_wire(wire.winner),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireSummary {
    duel_id: String,
    stake: Stake,
    turn_count: usize,
    #[serde(default)]
    winner: Option<WireWinner>,
    finished_at: DateTime<Utc>,
}

impl From<WireSummary> for DuelSummary {
    fn from(wire: WireSummary) -> Self {
        Self {
            id: DuelId::new(wire.duel_id),
            stake: wire.stake,
            turn_count: wire.turn_count,
            winner: winner_from_wire(wire.winner),
            finished_at: wire.finished_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct CommitBody<'a> {
    roast_cid: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct RejectionBody {
    #[serde(default)]
    message: String,
}

/// Ledger adapter speaking to the duel-state gateway.
#[derive(Debug, Clone)]
pub struct HttpDuelLedger {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpDuelLedger {
    /// Creates a ledger client for `base_url`. `token`, if given, is sent as
    /// a bearer token with every commit.
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, token)
    }

    /// Like [`HttpDuelLedger::new`], reusing an existing client.
    #[must_use]
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            token,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        url: &str,
    ) -> Result<Option<T>, DuelError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| map_send_error(operation, &err))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(error_from_response(operation, response).await);
        }
        let body = response
            .json::<T>()
            .await
            .map_err(|err| DuelError::MalformedResponse(format!("{operation}: {err}")))?;
        Ok(Some(body))
    }
}

#[async_trait]
impl DuelLedger for HttpDuelLedger {
    #[instrument(skip(self))]
    async fn list_outstanding_generation_requests(
        &self,
    ) -> Result<Vec<GenerationRequest>, DuelError> {
        let url = format!("{}/roast-queue", self.base_url);
        let queue: Vec<RoastIndex> = self
            .get_json("ledger.roast_queue", &url)
            .await?
            .ok_or_else(|| DuelError::Infrastructure(format!("{url} not found")))?;
        debug!(outstanding = queue.len(), "roast queue read");
        Ok(queue.into_iter().map(GenerationRequest::from).collect())
    }

    #[instrument(skip(self, address), fields(%address))]
    async fn commit_turn_content(
        &self,
        duel_id: &DuelId,
        turn_index: usize,
        address: &ContentAddress,
    ) -> Result<(), DuelError> {
        let operation = "ledger.commit";
        let url = format!(
            "{}/duels/{}/turns/{turn_index}/roast",
            self.base_url, duel_id
        );
        let mut request = self.client.put(&url).json(&CommitBody {
            roast_cid: address.as_str(),
        });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|err| map_send_error(operation, &err))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(DuelError::DuelNotFound(duel_id.clone())),
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                let rejection = response
                    .json::<RejectionBody>()
                    .await
                    .unwrap_or_default();
                Err(DuelError::CommitRejected {
                    duel_id: duel_id.clone(),
                    turn_index,
                    reason: rejection.message,
                })
            }
            _ => Err(error_from_response(operation, response).await),
        }
    }

    #[instrument(skip(self))]
    async fn get_duel(&self, duel_id: &DuelId) -> Result<Option<Duel>, DuelError> {
        let url = format!("{}/duels/{}", self.base_url, duel_id);
        let duel: Option<WireDuel> = self.get_json("ledger.get_duel", &url).await?;
        Ok(duel.map(Duel::from))
    }

    #[instrument(skip(self))]
    async fn list_finished_duels(&self, limit: usize) -> Result<Vec<DuelSummary>, DuelError> {
        let url = format!("{}/duels/finished?limit={limit}", self.base_url);
        let finished: Vec<WireSummary> = self
            .get_json("ledger.list_finished", &url)
            .await?
            .unwrap_or_default();
        Ok(finished.into_iter().map(DuelSummary::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_duel_maps_empty_cid_to_no_content() {
        // Arrange
        let json = serde_json::json!({
            "duel_id": "d1",
            "stake": "1000000000000000000000000",
            "player_a": "alice.near",
            "figure_a": "JuliusCaesar",
            "player_b": "bob.near",
            "figure_b": "MarkTwain",
            "turns": [
                {"damage": 15, "style": "Brutal", "roast_cid": "bafyroast"},
                {"damage": 3, "style": "Witty", "roast_cid": ""}
            ],
            "winner": null
        });

        // Act
        let duel: Duel = serde_json::from_value::<WireDuel>(json).unwrap().into();

        // Assert
        assert_eq!(duel.stake, Stake(10u128.pow(24)));
        assert_eq!(
            duel.turns[0].content,
            Some(ContentAddress::new("bafyroast"))
        );
        assert_eq!(duel.turns[1].content, None);
        assert_eq!(duel.winner, Winner::Unresolved);
    }

    #[test]
    fn test_wire_winner_names() {
        assert_eq!(winner_from_wire(Some(WireWinner::PlayerA)), Winner::SideA);
        assert_eq!(winner_from_wire(Some(WireWinner::PlayerB)), Winner::SideB);
        assert_eq!(winner_from_wire(Some(WireWinner::Draw)), Winner::Draw);
    }
}
