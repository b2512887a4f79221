//! Wire messages exchanged with players. Every frame is a JSON object with a
//! camelCase `type` discriminator and camelCase fields.

use serde::{Deserialize, Serialize};

use crate::domain::board::{Player, Position};
use crate::domain::errors::Rejection;
use crate::domain::moves::Move;
use crate::domain::rules::MoveRequest;
use crate::domain::SerializedBoard;
use crate::errors::ErrorCode;
use crate::room::state::RoomEvent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ClientMsg {
    /// Either a board snapshot after the move, or explicit coordinates.
    Move {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        board: Option<SerializedBoard>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from_row: Option<u8>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from_col: Option<u8>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to_row: Option<u8>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to_col: Option<u8>,
    },
    ResetGame,
    GameEnd {
        winner: Player,
    },
}

impl ClientMsg {
    pub fn explicit_move(mv: Move) -> Self {
        ClientMsg::Move {
            board: None,
            from_row: Some(mv.from.row()),
            from_col: Some(mv.from.col()),
            to_row: Some(mv.to.row()),
            to_col: Some(mv.to.col()),
        }
    }

    pub fn snapshot_move(board: SerializedBoard) -> Self {
        ClientMsg::Move {
            board: Some(board),
            from_row: None,
            from_col: None,
            to_row: None,
            to_col: None,
        }
    }
}

/// Turns the fields of a `move` frame into a request. Complete, in-bounds
/// coordinates win over a snapshot when both are present.
pub fn move_request(
    board: Option<SerializedBoard>,
    from_row: Option<u8>,
    from_col: Option<u8>,
    to_row: Option<u8>,
    to_col: Option<u8>,
) -> Result<MoveRequest, Rejection> {
    match (from_row, from_col, to_row, to_col, board) {
        (Some(fr), Some(fc), Some(tr), Some(tc), _) => {
            let from = Position::new(fr, fc).ok_or(Rejection::MalformedMove)?;
            let to = Position::new(tr, tc).ok_or(Rejection::MalformedMove)?;
            Ok(MoveRequest::Explicit(Move::new(from, to)))
        }
        (None, None, None, None, Some(board)) => Ok(MoveRequest::Snapshot(board.into_inner())),
        _ => Err(Rejection::MalformedMove),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerMsg {
    PlayerNumber {
        number: Player,
    },
    WaitingForOpponent,
    StartGame,
    OpponentMove {
        board: SerializedBoard,
        current_player: Player,
    },
    ResetGame,
    GameEnd {
        winner: Player,
    },
    PlayerDisconnected {
        player: Player,
    },
    RoomFull,
    MoveRejected {
        reason: ErrorCode,
    },
}

impl From<RoomEvent> for ServerMsg {
    fn from(event: RoomEvent) -> Self {
        match event {
            RoomEvent::Assigned { player } => ServerMsg::PlayerNumber { number: player },
            RoomEvent::WaitingForOpponent => ServerMsg::WaitingForOpponent,
            RoomEvent::StartGame => ServerMsg::StartGame,
            RoomEvent::OpponentMove {
                board,
                current_player,
            } => ServerMsg::OpponentMove {
                board: board.into(),
                current_player,
            },
            RoomEvent::ResetGame => ServerMsg::ResetGame,
            RoomEvent::GameEnd { winner } => ServerMsg::GameEnd { winner },
            RoomEvent::PlayerDisconnected { player } => ServerMsg::PlayerDisconnected { player },
            RoomEvent::MoveRejected { reason } => ServerMsg::MoveRejected {
                reason: reason.code(),
            },
        }
    }
}
