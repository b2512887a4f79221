// Seating, game start and the room-full refusal.

use std::time::Duration;

use checkers_backend::config::Config;
use checkers_backend::room::Phase;
use checkers_backend::test_support::start_test_server;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

use crate::support::websocket_client::{start_game, TestResult, WebSocketClient};

const RETRY: Duration = Duration::from_secs(1);

#[actix_web::test]
async fn first_player_is_told_to_wait() -> TestResult<()> {
    let server = start_test_server(Config::default()).await?;

    let (mut a, number) = WebSocketClient::join(&server.ws_url()).await?;
    assert_eq!(number, 1);
    a.expect_type("waitingForOpponent").await?;

    let status = server.status().await?;
    assert_eq!(status.phase, Phase::WaitingForOpponent);
    assert_eq!(status.occupied_slots, 1);

    a.close().await?;
    server.stop().await;
    Ok(())
}

#[actix_web::test]
async fn second_player_starts_the_game_for_both() -> TestResult<()> {
    let server = start_test_server(Config::default()).await?;

    let (mut a, mut b) = start_game(&server.ws_url()).await?;

    let status = server.status().await?;
    assert_eq!(status.phase, Phase::InProgress);
    assert_eq!(status.occupied_slots, 2);

    a.expect_silence().await?;
    b.expect_silence().await?;

    a.close().await?;
    b.close().await?;
    server.stop().await;
    Ok(())
}

#[actix_web::test]
async fn third_player_gets_room_full_and_a_normal_close() -> TestResult<()> {
    let server = start_test_server(Config::default()).await?;
    let (mut a, mut b) = start_game(&server.ws_url()).await?;

    let mut c = WebSocketClient::connect_retry(&server.ws_url(), RETRY).await?;
    c.expect_type("roomFull").await?;
    let frame = c.expect_close().await?.ok_or("close frame missing")?;
    assert_eq!(frame.code, CloseCode::Normal);
    assert_eq!(frame.reason.as_str(), "Room is full");

    // The seated players are unaffected.
    a.expect_silence().await?;
    b.expect_silence().await?;
    assert_eq!(server.status().await?.occupied_slots, 2);

    a.close().await?;
    b.close().await?;
    server.stop().await;
    Ok(())
}

#[actix_web::test]
async fn closing_both_players_empties_the_room() -> TestResult<()> {
    let server = start_test_server(Config::default()).await?;
    let (mut a, mut b) = start_game(&server.ws_url()).await?;

    a.close().await?;
    b.close().await?;
    server.wait_for_slots(0, RETRY).await?;
    assert_eq!(server.status().await?.phase, Phase::Empty);

    server.stop().await;
    Ok(())
}
