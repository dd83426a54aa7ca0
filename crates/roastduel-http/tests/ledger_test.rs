//! `HttpDuelLedger` against a mock gateway.

use roastduel_core::content::ContentAddress;
use roastduel_core::duel::{DuelId, FigureId, RoastStyle, Stake, Winner};
use roastduel_core::error::{DuelError, ErrorKind};
use roastduel_core::ports::DuelLedger;
use roastduel_http::HttpDuelLedger;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_roast_queue_maps_to_generation_requests() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/roast-queue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "duel_id": "d1",
                "turn": 0,
                "current_figure": "JuliusCaesar",
                "next_figure": "MarkTwain",
                "damage": 15,
                "style": "Brutal"
            }
        ])))
        .mount(&server)
        .await;
    let ledger = HttpDuelLedger::new(server.uri(), None);

    // Act
    let requests = ledger.list_outstanding_generation_requests().await.unwrap();

    // Assert
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.duel_id, DuelId::new("d1"));
    assert_eq!(request.turn_index, 0);
    assert_eq!(request.acting_figure, FigureId::new("JuliusCaesar"));
    assert_eq!(request.target_figure, FigureId::new("MarkTwain"));
    assert_eq!(request.damage, 15);
    assert_eq!(request.style, RoastStyle::Brutal);
}

#[tokio::test]
async fn test_commit_sends_address_with_token() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/duels/d1/turns/0/roast"))
        .and(header("authorization", "Bearer secret"))
        .and(body_json(json!({"roast_cid": "bafyroast"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let ledger = HttpDuelLedger::new(server.uri(), Some("secret".into()));

    // Act
    let result = ledger
        .commit_turn_content(&DuelId::new("d1"), 0, &ContentAddress::new("bafyroast"))
        .await;

    // Assert
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_commit_conflict_is_a_permanent_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/duels/d1/turns/0/roast"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "roast already set"})),
        )
        .mount(&server)
        .await;
    let ledger = HttpDuelLedger::new(server.uri(), None);

    let err = ledger
        .commit_turn_content(&DuelId::new("d1"), 0, &ContentAddress::new("bafyother"))
        .await
        .unwrap_err();

    match &err {
        DuelError::CommitRejected { reason, .. } => assert_eq!(reason, "roast already set"),
        other => panic!("expected a rejection, got {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::Permanent);
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/roast-queue"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let ledger = HttpDuelLedger::new(server.uri(), None);

    let err = ledger
        .list_outstanding_generation_requests()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transient);
}

#[tokio::test]
async fn test_get_duel_reads_turns_and_winner() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/duels/d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "duel_id": "d1",
            "stake": "2000000000000000000000000",
            "player_a": "alice.near",
            "figure_a": "JuliusCaesar",
            "player_b": "bob.near",
            "figure_b": "MarkTwain",
            "turns": [{"damage": 15, "style": "Brutal", "roast_cid": "bafyroast"}],
            "winner": "PlayerA"
        })))
        .mount(&server)
        .await;
    let ledger = HttpDuelLedger::new(server.uri(), None);

    // Act
    let duel = ledger.get_duel(&DuelId::new("d1")).await.unwrap().unwrap();

    // Assert
    assert_eq!(duel.stake, Stake(2 * 10u128.pow(24)));
    assert_eq!(duel.side_a.player, "alice.near");
    assert_eq!(duel.side_b.figure, FigureId::new("MarkTwain"));
    assert_eq!(
        duel.turns[0].content,
        Some(ContentAddress::new("bafyroast"))
    );
    assert_eq!(duel.winner, Winner::SideA);
}

#[tokio::test]
async fn test_unknown_duel_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/duels/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let ledger = HttpDuelLedger::new(server.uri(), None);

    let duel = ledger.get_duel(&DuelId::new("missing")).await.unwrap();

    assert!(duel.is_none());
}

#[tokio::test]
async fn test_finished_duels_pass_limit() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/duels/finished"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "duel_id": "d9",
                "stake": "5",
                "turn_count": 10,
                "winner": "PlayerB",
                "finished_at": "2026-03-15T11:00:00Z"
            }
        ])))
        .mount(&server)
        .await;
    let ledger = HttpDuelLedger::new(server.uri(), None);

    // Act
    let finished = ledger.list_finished_duels(50).await.unwrap();

    // Assert
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].id, DuelId::new("d9"));
    assert_eq!(finished[0].turn_count, 10);
    assert_eq!(finished[0].winner, Winner::SideB);
}

#[tokio::test]
async fn test_garbage_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/roast-queue"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    let ledger = HttpDuelLedger::new(server.uri(), None);

    let err = ledger
        .list_outstanding_generation_requests()
        .await
        .unwrap_err();

    assert!(matches!(err, DuelError::MalformedResponse(_)));
}
