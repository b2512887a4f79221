// Server-initiated close of every player connection.

use std::time::Duration;

use checkers_backend::config::Config;
use checkers_backend::room::CloseAll;
use checkers_backend::test_support::start_test_server;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

use crate::support::websocket_client::{start_game, TestResult};

#[actix_web::test]
async fn close_all_sends_a_going_away_frame_to_each_player() -> TestResult<()> {
    let server = start_test_server(Config::default()).await?;
    let (mut a, mut b) = start_game(&server.ws_url()).await?;

    let asked = server.state.room().send(CloseAll).await?;
    assert_eq!(asked, 2);

    for client in [&mut a, &mut b] {
        let frame = client.expect_close().await?.ok_or("close frame missing")?;
        assert_eq!(frame.code, CloseCode::Away);
    }
    server.wait_for_slots(0, Duration::from_secs(1)).await?;

    server.stop().await;
    Ok(())
}

#[actix_web::test]
async fn close_all_on_an_empty_room_is_harmless() -> TestResult<()> {
    let server = start_test_server(Config::default()).await?;

    assert_eq!(server.state.room().send(CloseAll).await?, 0);
    assert_eq!(server.status().await?.occupied_slots, 0);

    server.stop().await;
    Ok(())
}
