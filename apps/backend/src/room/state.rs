//! Two-slot room state machine.
//!
//! `Room` is pure: every operation returns the deliveries the caller must
//! route to connections, and a rejected request leaves the room untouched.
//! Serialising access is the actor's job (see `room::actor`).

use actix::Message;
use uuid::Uuid;

use crate::domain::board::{Board, Player};
use crate::domain::errors::Rejection;
use crate::domain::moves::winner;
use crate::domain::rules::{ensure_can_act, resolve_request, try_move, GameView, MoveRequest};
use crate::domain::RuleSet;

/// Identifies one relay connection for its whole lifetime.
pub type ConnId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slot {
    #[default]
    Unoccupied,
    Occupied(ConnId),
}

impl Slot {
    pub fn conn(self) -> Option<ConnId> {
        match self {
            Slot::Unoccupied => None,
            Slot::Occupied(conn) => Some(conn),
        }
    }

    pub fn is_occupied(self) -> bool {
        matches!(self, Slot::Occupied(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    NoPieces,
    NoMoves,
    Resignation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    WaitingForOpponent,
    InProgress,
    Finished { winner: Player, reason: EndReason },
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Empty => "empty",
            Phase::WaitingForOpponent => "waiting_for_opponent",
            Phase::InProgress => "in_progress",
            Phase::Finished { .. } => "finished",
        }
    }
}

/// Something a connection must be told.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
#[rtype(result = "()")]
pub enum RoomEvent {
    Assigned { player: Player },
    WaitingForOpponent,
    StartGame,
    OpponentMove { board: Board, current_player: Player },
    ResetGame,
    GameEnd { winner: Player },
    PlayerDisconnected { player: Player },
    MoveRejected { reason: Rejection },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub to: ConnId,
    pub event: RoomEvent,
}

pub type Outbox = Vec<Delivery>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("room is full")]
pub struct RoomFull;

#[derive(Debug, Clone)]
pub struct Room {
    slots: [Slot; 2],
    board: Board,
    turn: Player,
    phase: Phase,
    rules: RuleSet,
}

impl Room {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            slots: [Slot::Unoccupied; 2],
            board: Board::initial(),
            turn: Player::One,
            phase: Phase::Empty,
            rules,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn slot(&self, player: Player) -> Slot {
        self.slots[player.index()]
    }

    pub fn occupied_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_occupied()).count()
    }

    /// The player `conn` is seated as, if any.
    pub fn player_of(&self, conn: ConnId) -> Option<Player> {
        self.slots
            .iter()
            .position(|slot| *slot == Slot::Occupied(conn))
            .and_then(Player::from_index)
    }

    fn occupants(&self) -> impl Iterator<Item = ConnId> + '_ {
        self.slots.iter().filter_map(|slot| slot.conn())
    }

    fn broadcast(&self, event: RoomEvent) -> Outbox {
        self.occupants()
            .map(|to| Delivery {
                to,
                event: event.clone(),
            })
            .collect()
    }

    fn seated(&self, conn: ConnId) -> Result<Player, Rejection> {
        self.player_of(conn).ok_or(Rejection::NotSeated)
    }

    fn view(&self) -> GameView<'_> {
        GameView {
            board: &self.board,
            turn: self.turn,
            in_progress: self.phase == Phase::InProgress,
        }
    }

    fn start_game(&mut self) {
        self.board = Board::initial();
        self.turn = Player::One;
        self.phase = Phase::InProgress;
    }

    /// Seats `conn` in the lowest free slot. Joining twice returns the slot
    /// already held and emits nothing.
    pub fn join(&mut self, conn: ConnId) -> Result<(Player, Outbox), RoomFull> {
        if let Some(player) = self.player_of(conn) {
            return Ok((player, Vec::new()));
        }

        let index = self
            .slots
            .iter()
            .position(|slot| !slot.is_occupied())
            .ok_or(RoomFull)?;
        let player = Player::from_index(index).ok_or(RoomFull)?;
        self.slots[index] = Slot::Occupied(conn);

        let mut out = vec![Delivery {
            to: conn,
            event: RoomEvent::Assigned { player },
        }];

        if self.occupied_slots() == self.slots.len() {
            self.start_game();
            out.extend(self.broadcast(RoomEvent::StartGame));
        } else {
            self.phase = Phase::WaitingForOpponent;
            out.push(Delivery {
                to: conn,
                event: RoomEvent::WaitingForOpponent,
            });
        }
        Ok((player, out))
    }

    /// Frees the slot held by `conn`. A no-op for connections without a slot.
    pub fn leave(&mut self, conn: ConnId) -> Outbox {
        let Some(player) = self.player_of(conn) else {
            return Vec::new();
        };
        self.slots[player.index()] = Slot::Unoccupied;

        match self.slot(player.opponent()).conn() {
            Some(remaining) => {
                self.phase = Phase::WaitingForOpponent;
                vec![
                    Delivery {
                        to: remaining,
                        event: RoomEvent::PlayerDisconnected { player },
                    },
                    Delivery {
                        to: remaining,
                        event: RoomEvent::WaitingForOpponent,
                    },
                ]
            }
            None => {
                self.phase = Phase::Empty;
                Vec::new()
            }
        }
    }

    pub fn submit_move(&mut self, conn: ConnId, request: &MoveRequest) -> Result<Outbox, Rejection> {
        let mover = self.seated(conn)?;
        let view = self.view();
        ensure_can_act(&view, mover)?;
        let mv = resolve_request(&self.board, mover, request)?;
        let applied = try_move(&view, mover, mv, &self.rules)?;

        self.board = applied.board;
        self.turn = applied.next_turn;

        let mut out = Vec::new();
        if let Some(other) = self.slot(mover.opponent()).conn() {
            out.push(Delivery {
                to: other,
                event: RoomEvent::OpponentMove {
                    board: self.board.clone(),
                    current_player: self.turn,
                },
            });
        }
        if let Some(won) = applied.winner {
            let reason = self.board_reason(won);
            out.extend(self.finish(won, reason));
        }
        Ok(out)
    }

    /// A participant's claim that the game is over. Honoured when it agrees
    /// with the board, or when the sender concedes to their opponent.
    pub fn declare_winner(&mut self, conn: ConnId, declared: Player) -> Result<Outbox, Rejection> {
        let sender = self.seated(conn)?;
        if self.phase != Phase::InProgress {
            return Err(Rejection::GameNotInProgress);
        }

        let reason = if winner(&self.board, self.turn) == Some(declared) {
            self.board_reason(declared)
        } else if declared == sender.opponent() {
            EndReason::Resignation
        } else {
            return Err(Rejection::UntrustedWinner);
        };
        Ok(self.finish(declared, reason))
    }

    pub fn reset(&mut self, conn: ConnId) -> Result<Outbox, Rejection> {
        self.seated(conn)?;
        if self.occupied_slots() == self.slots.len() {
            self.start_game();
        } else {
            self.board = Board::initial();
            self.turn = Player::One;
            self.phase = Phase::WaitingForOpponent;
        }
        Ok(self.broadcast(RoomEvent::ResetGame))
    }

    fn board_reason(&self, winner: Player) -> EndReason {
        if self.board.piece_count(winner.opponent()) == 0 {
            EndReason::NoPieces
        } else {
            EndReason::NoMoves
        }
    }

    fn finish(&mut self, winner: Player, reason: EndReason) -> Outbox {
        self.phase = Phase::Finished { winner, reason };
        self.broadcast(RoomEvent::GameEnd { winner })
    }
}

#[cfg(test)]
impl Room {
    /// Puts an arbitrary position on the board without going through play.
    pub(crate) fn overwrite_position(&mut self, board: Board, turn: Player) {
        self.board = board;
        self.turn = turn;
    }
}

impl Default for Room {
    fn default() -> Self {
        Room::new(RuleSet::default())
    }
}
