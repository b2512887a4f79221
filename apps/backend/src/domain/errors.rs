use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::errors::ErrorCode;

/// Why the room refused a participant's request. Rejections never change
/// room state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotSeated,
    GameNotInProgress,
    NotYourTurn,
    IllegalMove,
    JumpRequired,
    MalformedMove,
    UntrustedWinner,
}

impl Rejection {
    pub fn code(&self) -> ErrorCode {
        match self {
            Rejection::NotSeated => ErrorCode::NotSeated,
            Rejection::GameNotInProgress => ErrorCode::GameNotInProgress,
            Rejection::NotYourTurn => ErrorCode::NotYourTurn,
            Rejection::IllegalMove => ErrorCode::IllegalMove,
            Rejection::JumpRequired => ErrorCode::JumpRequired,
            Rejection::MalformedMove => ErrorCode::MalformedMove,
            Rejection::UntrustedWinner => ErrorCode::UntrustedWinner,
        }
    }
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Rejection::NotSeated => write!(f, "sender holds no slot"),
            Rejection::GameNotInProgress => write!(f, "no game in progress"),
            Rejection::NotYourTurn => write!(f, "not your turn"),
            Rejection::IllegalMove => write!(f, "illegal move"),
            Rejection::JumpRequired => write!(f, "a jump is available and must be taken"),
            Rejection::MalformedMove => write!(f, "malformed move"),
            Rejection::UntrustedWinner => write!(f, "declared winner does not match the board"),
        }
    }
}

impl Error for Rejection {}
