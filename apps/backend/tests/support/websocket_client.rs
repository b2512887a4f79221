// WebSocket client utilities for testing

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub type TestResult<T> = Result<T, Box<dyn std::error::Error>>;

/// How long to wait for a frame the test expects to arrive.
pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);
/// How long to listen when asserting that nothing arrives.
pub const QUIET_PERIOD: Duration = Duration::from_millis(150);

/// A player's socket, speaking the relay's JSON frames.
pub struct WebSocketClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WebSocketClient {
    /// Connect, retrying until the listener accepts or `timeout` passes.
    pub async fn connect_retry(url: &str, timeout: Duration) -> TestResult<Self> {
        let start = tokio::time::Instant::now();
        loop {
            match connect_async(url).await {
                Ok((stream, _)) => return Ok(Self { stream }),
                Err(err) => {
                    if start.elapsed() >= timeout {
                        return Err(Box::new(err));
                    }
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            }
        }
    }

    /// Connect and read the seat assignment. Returns the player number.
    pub async fn join(url: &str) -> TestResult<(Self, u64)> {
        let mut client = Self::connect_retry(url, Duration::from_secs(1)).await?;
        let assigned = client.expect_type("playerNumber").await?;
        let number = assigned["number"].as_u64().ok_or("playerNumber without number")?;
        Ok((client, number))
    }

    pub async fn recv_timeout(&mut self, timeout: Duration) -> TestResult<Option<Message>> {
        tokio::time::timeout(timeout, self.stream.next())
            .await
            .map_err(|_| "Timeout waiting for message")?
            .transpose()
            .map_err(|e| e.into())
    }

    pub async fn send_text(&mut self, text: &str) -> TestResult<()> {
        self.stream.send(Message::Text(text.to_string().into())).await?;
        Ok(())
    }

    pub async fn send_json(&mut self, value: &Value) -> TestResult<()> {
        self.send_text(&value.to_string()).await
    }

    pub async fn send_binary(&mut self, bytes: Vec<u8>) -> TestResult<()> {
        self.stream.send(Message::Binary(bytes.into())).await?;
        Ok(())
    }

    pub async fn send_move(&mut self, from: (u8, u8), to: (u8, u8)) -> TestResult<()> {
        self.send_json(&json!({
            "type": "move",
            "fromRow": from.0,
            "fromCol": from.1,
            "toRow": to.0,
            "toCol": to.1,
        }))
        .await
    }

    /// Next text frame as JSON, skipping pings. `None` once the socket closes.
    pub async fn recv_json_timeout(&mut self, timeout: Duration) -> TestResult<Option<Value>> {
        loop {
            match self.recv_timeout(timeout).await? {
                Some(Message::Text(text)) => return Ok(Some(serde_json::from_str(text.as_str())?)),
                Some(Message::Ping(_)) | Some(Message::Pong(_)) => continue,
                Some(_) | None => return Ok(None),
            }
        }
    }

    /// Next frame must be JSON with the given `type`.
    pub async fn expect_type(&mut self, ty: &str) -> TestResult<Value> {
        let value = self
            .recv_json_timeout(RECV_TIMEOUT)
            .await?
            .ok_or_else(|| format!("socket closed while waiting for {ty}"))?;
        if value["type"] != ty {
            return Err(format!("expected {ty}, got {value}").into());
        }
        Ok(value)
    }

    /// Asserts no text frame arrives within the quiet period.
    pub async fn expect_silence(&mut self) -> TestResult<()> {
        match tokio::time::timeout(QUIET_PERIOD, self.stream.next()).await {
            Err(_elapsed) => Ok(()),
            Ok(Some(Ok(Message::Text(text)))) => {
                Err(format!("expected silence, got {}", text.as_str()).into())
            }
            Ok(_) => Ok(()),
        }
    }

    /// Reads until a close frame arrives and returns it.
    pub async fn expect_close(&mut self) -> TestResult<Option<CloseFrame>> {
        loop {
            match self.recv_timeout(RECV_TIMEOUT).await? {
                Some(Message::Close(frame)) => return Ok(frame),
                Some(_) => continue,
                None => return Ok(None),
            }
        }
    }

    pub async fn close(&mut self) -> TestResult<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}

/// Connects two players and consumes the opening frames on both sides.
pub async fn start_game(url: &str) -> TestResult<(WebSocketClient, WebSocketClient)> {
    let (mut a, a_number) = WebSocketClient::join(url).await?;
    assert_eq!(a_number, 1);
    a.expect_type("waitingForOpponent").await?;

    let (mut b, b_number) = WebSocketClient::join(url).await?;
    assert_eq!(b_number, 2);

    a.expect_type("startGame").await?;
    b.expect_type("startGame").await?;
    Ok((a, b))
}
