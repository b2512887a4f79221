//! Socket ownership and the reconnect loop.

use std::time::Duration;

use checkers_backend::ws::protocol::{ClientMsg, ServerMsg};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backoff::Backoff;
use crate::error::ClientError;
use crate::state::ClientState;

/// Decides what to send after each server event.
pub trait Brain {
    /// Called after `event` has been applied to `state`.
    fn react(&mut self, event: &ServerMsg, state: &mut ClientState) -> Option<ClientMsg>;

    /// Checked after every event; `true` closes the socket for good.
    fn is_done(&self, _state: &ClientState) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The token was cancelled.
    Cancelled,
    /// The brain asked to stop.
    Done,
    /// Both slots were taken. Reconnecting would not help.
    RoomFull,
}

/// Keeps a client connected, reconnecting on transport failures after the
/// delay the [`Backoff`] prescribes.
pub struct Reconnector {
    url: String,
    backoff: Backoff,
    cancel: CancellationToken,
    max_attempts: Option<u32>,
}

impl Reconnector {
    pub fn new(url: impl Into<String>, backoff: Backoff, cancel: CancellationToken) -> Self {
        Self {
            url: url.into(),
            backoff,
            cancel,
            max_attempts: None,
        }
    }

    /// Give up after `attempts` consecutive failed connections.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn run<B: Brain>(
        &self,
        state: &mut ClientState,
        brain: &mut B,
    ) -> Result<SessionEnd, ClientError> {
        let mut attempt = 0u32;

        loop {
            if self.cancel.is_cancelled() {
                return Ok(SessionEnd::Cancelled);
            }

            state.reconnecting();
            let err = match play(&self.url, state, brain, &self.cancel).await {
                Ok(end) => {
                    info!(?end, url = %self.url, "[CLIENT] session ended");
                    return Ok(end);
                }
                Err(err) if !err.is_transient() => return Err(err),
                Err(err) => err,
            };

            // A seat was held, so the server was reachable: start over.
            if state.player().is_some() {
                attempt = 0;
            }
            attempt += 1;
            if self.max_attempts.is_some_and(|max| attempt > max) {
                warn!(error = %err, attempt, "[CLIENT] giving up");
                return Err(ClientError::RetriesExhausted {
                    attempts: attempt - 1,
                });
            }

            let delay = self.backoff.delay(attempt);
            warn!(
                error = %err,
                attempt,
                retry_delay_secs = delay.as_secs_f64(),
                "[CLIENT] connection lost, retrying"
            );
            if !self.pause(delay).await {
                return Ok(SessionEnd::Cancelled);
            }
        }
    }

    /// Sleeps for `delay`; `false` when cancelled first.
    async fn pause(&self, delay: Duration) -> bool {
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }
}

/// One connection, from handshake to close.
async fn play<B: Brain>(
    url: &str,
    state: &mut ClientState,
    brain: &mut B,
    cancel: &CancellationToken,
) -> Result<SessionEnd, ClientError> {
    let (socket, _) = tokio::select! {
        _ = cancel.cancelled() => return Ok(SessionEnd::Cancelled),
        connected = connect_async(url) => connected?,
    };
    debug!(url, "[CLIENT] connected");
    let (mut sink, mut stream) = socket.split();

    loop {
        let frame = tokio::select! {
            _ = cancel.cancelled() => {
                let _ = sink.send(Message::Close(None)).await;
                return Ok(SessionEnd::Cancelled);
            }
            frame = stream.next() => frame,
        };

        let text = match frame {
            None | Some(Ok(Message::Close(_))) => return Err(ClientError::Closed),
            Some(Err(err)) => return Err(err.into()),
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(_)) => continue,
        };

        let event: ServerMsg = match serde_json::from_str(text.as_str()) {
            Ok(event) => event,
            Err(err) => {
                warn!(error = %err, "[CLIENT] ignoring undecodable frame");
                continue;
            }
        };
        debug!(?event, "[CLIENT] received");
        state.apply(&event);

        if event == ServerMsg::RoomFull {
            let _ = sink.close().await;
            return Ok(SessionEnd::RoomFull);
        }

        if let Some(intent) = brain.react(&event, state) {
            let payload = serde_json::to_string(&intent)?;
            sink.send(Message::Text(payload.into())).await?;
        }

        if brain.is_done(state) {
            let _ = sink.send(Message::Close(None)).await;
            return Ok(SessionEnd::Done);
        }
    }
}
