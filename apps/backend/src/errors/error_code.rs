//! Error codes for the checkers relay.
//!
//! Every code that reaches a client, either inside a `moveRejected` frame or
//! in an HTTP problem-details body, is defined here. Never pass ad-hoc
//! strings as error codes.
//!
//! Codes are SCREAMING_SNAKE_CASE and map 1:1 to the wire strings.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Room membership
    /// Both slots are occupied
    RoomFull,
    /// The sender holds no slot in the room
    NotSeated,

    // Rule rejections
    /// A move arrived from the player who is not due to move
    NotYourTurn,
    /// The move shape or target square is not allowed
    IllegalMove,
    /// A capture is available and must be taken
    JumpRequired,
    /// The room is not currently playing a game
    GameNotInProgress,
    /// The move payload could not be turned into a move
    MalformedMove,
    /// A declared winner does not match the board
    UntrustedWinner,

    // Protocol
    /// An inbound frame could not be decoded
    MalformedMessage,
    /// General bad request error
    BadRequest,

    // System Errors
    /// The room actor did not answer
    RoomUnavailable,
    /// Internal server error
    InternalError,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 13] = [
        Self::RoomFull,
        Self::NotSeated,
        Self::NotYourTurn,
        Self::IllegalMove,
        Self::JumpRequired,
        Self::GameNotInProgress,
        Self::MalformedMove,
        Self::UntrustedWinner,
        Self::MalformedMessage,
        Self::BadRequest,
        Self::RoomUnavailable,
        Self::InternalError,
        Self::ConfigError,
    ];

    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RoomFull => "ROOM_FULL",
            Self::NotSeated => "NOT_SEATED",

            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::IllegalMove => "ILLEGAL_MOVE",
            Self::JumpRequired => "JUMP_REQUIRED",
            Self::GameNotInProgress => "GAME_NOT_IN_PROGRESS",
            Self::MalformedMove => "MALFORMED_MOVE",
            Self::UntrustedWinner => "UNTRUSTED_WINNER",

            Self::MalformedMessage => "MALFORMED_MESSAGE",
            Self::BadRequest => "BAD_REQUEST",

            Self::RoomUnavailable => "ROOM_UNAVAILABLE",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    pub fn from_code(code: &str) -> Option<ErrorCode> {
        Self::ALL.into_iter().find(|c| c.as_str() == code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ErrorCode::from_code(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("Unknown error code: {s}")))
    }
}
