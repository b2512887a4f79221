use checkers_backend::domain::Move;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Why an intent could not be turned into a frame. Nothing is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("no player number assigned yet")]
    Unassigned,
    #[error("no game in progress")]
    NotPlaying,
    #[error("not this player's turn")]
    NotYourTurn,
    #[error("move {0} is not permitted here")]
    NotPermitted(Move),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
    #[error("could not encode frame: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("connection closed by server")]
    Closed,
    #[error("gave up after {attempts} reconnect attempts")]
    RetriesExhausted { attempts: u32 },
}

impl ClientError {
    /// Whether another connection attempt could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ClientError::WebSocket(_) | ClientError::Closed)
    }
}
