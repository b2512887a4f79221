//! Optimistic client-side view of the room.
//!
//! Local moves are applied immediately and remembered until the server
//! either relays the opponent's reply (the move stood) or answers with
//! `moveRejected` (the move is rolled back). Boards pushed by the server
//! always replace the local one.

use checkers_backend::domain::{
    apply_move, permitted_moves, Board, Move, Player, Position, RuleSet, SerializedBoard,
};
use checkers_backend::errors::ErrorCode;
use checkers_backend::ws::protocol::{ClientMsg, ServerMsg};

use crate::error::IntentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Socket open (or opening), no slot assigned yet.
    Connecting,
    WaitingForOpponent,
    Playing,
    Finished { winner: Player },
    /// The room turned this client away. Terminal.
    RoomFull,
}

/// Board and turn as last agreed with the server.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Checkpoint {
    board: Board,
    turn: Player,
}

#[derive(Debug, Clone)]
pub struct ClientState {
    rules: RuleSet,
    player: Option<Player>,
    board: Board,
    turn: Player,
    status: Status,
    unconfirmed: Option<Checkpoint>,
    last_rejection: Option<ErrorCode>,
}

impl Default for ClientState {
    fn default() -> Self {
        Self::new(RuleSet::default())
    }
}

impl ClientState {
    /// `rules` should match the server's so that locally permitted moves are
    /// the ones the server accepts.
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            player: None,
            board: Board::initial(),
            turn: Player::One,
            status: Status::Connecting,
            unconfirmed: None,
            last_rejection: None,
        }
    }

    pub fn player(&self) -> Option<Player> {
        self.player
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn last_rejection(&self) -> Option<ErrorCode> {
        self.last_rejection
    }

    /// A local move is waiting for the server's verdict.
    pub fn has_unconfirmed_move(&self) -> bool {
        self.unconfirmed.is_some()
    }

    pub fn is_my_turn(&self) -> bool {
        self.status == Status::Playing && self.player == Some(self.turn)
    }

    /// Moves this client may make right now. Empty when it is not its turn.
    pub fn my_moves(&self) -> Vec<Move> {
        match self.player {
            Some(me) if self.is_my_turn() => permitted_moves(&self.board, me, &self.rules),
            _ => Vec::new(),
        }
    }

    /// Forgets the seat and any in-flight move before a fresh connection.
    /// The room seats reconnecting clients from scratch.
    pub fn reconnecting(&mut self) {
        self.player = None;
        self.status = Status::Connecting;
        self.unconfirmed = None;
    }

    /// Folds one server event into the local view.
    pub fn apply(&mut self, event: &ServerMsg) {
        match event {
            ServerMsg::PlayerNumber { number } => {
                self.player = Some(*number);
            }
            ServerMsg::WaitingForOpponent => {
                self.restart();
                self.status = Status::WaitingForOpponent;
            }
            ServerMsg::StartGame => {
                self.restart();
                self.status = Status::Playing;
            }
            ServerMsg::ResetGame => {
                self.restart();
                if self.status != Status::WaitingForOpponent {
                    self.status = Status::Playing;
                }
            }
            ServerMsg::OpponentMove {
                board,
                current_player,
            } => {
                self.board = board.0.clone();
                self.turn = *current_player;
                self.unconfirmed = None;
            }
            ServerMsg::GameEnd { winner } => {
                self.unconfirmed = None;
                self.status = Status::Finished { winner: *winner };
            }
            ServerMsg::PlayerDisconnected { .. } => {
                self.unconfirmed = None;
                self.status = Status::WaitingForOpponent;
            }
            ServerMsg::RoomFull => {
                self.status = Status::RoomFull;
            }
            ServerMsg::MoveRejected { reason } => {
                self.last_rejection = Some(*reason);
                if let Some(checkpoint) = self.unconfirmed.take() {
                    self.board = checkpoint.board;
                    self.turn = checkpoint.turn;
                }
            }
        }
    }

    /// Plays `from -> to` locally and returns the `move` frame carrying the
    /// resulting board. Nothing changes when the move is refused.
    pub fn intent_move(&mut self, from: Position, to: Position) -> Result<ClientMsg, IntentError> {
        let me = self.player.ok_or(IntentError::Unassigned)?;
        if self.status != Status::Playing {
            return Err(IntentError::NotPlaying);
        }
        if self.turn != me {
            return Err(IntentError::NotYourTurn);
        }

        let mv = Move::new(from, to);
        if !permitted_moves(&self.board, me, &self.rules).contains(&mv) {
            return Err(IntentError::NotPermitted(mv));
        }

        let next = apply_move(&self.board, &mv);
        self.unconfirmed = Some(Checkpoint {
            board: std::mem::replace(&mut self.board, next),
            turn: self.turn,
        });
        self.turn = me.opponent();
        Ok(ClientMsg::snapshot_move(SerializedBoard(self.board.clone())))
    }

    /// The board is reset when the server echoes `resetGame` back.
    pub fn intent_reset(&self) -> Result<ClientMsg, IntentError> {
        self.player.ok_or(IntentError::Unassigned)?;
        Ok(ClientMsg::ResetGame)
    }

    /// Concedes the current game to the opponent.
    pub fn intent_resign(&self) -> Result<ClientMsg, IntentError> {
        let me = self.player.ok_or(IntentError::Unassigned)?;
        if self.status != Status::Playing {
            return Err(IntentError::NotPlaying);
        }
        Ok(ClientMsg::GameEnd {
            winner: me.opponent(),
        })
    }

    fn restart(&mut self) {
        self.board = Board::initial();
        self.turn = Player::One;
        self.unconfirmed = None;
    }
}
