//! Move shapes, legality, capture application and terminal-state detection.
//!
//! Only forward single steps and forward single jumps exist. There are no
//! kings, no promotion and no chained captures.

use std::fmt;

use crate::domain::board::{Board, Cell, Player, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// One row forward, one column sideways.
    Step,
    /// Two rows forward, two columns sideways, over an opponent piece.
    Jump,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Move {
        Move { from, to }
    }

    fn deltas(&self) -> (i8, i8) {
        (
            self.to.row() as i8 - self.from.row() as i8,
            self.to.col() as i8 - self.from.col() as i8,
        )
    }

    /// Shape of this move for `mover`, or `None` if it is neither a forward
    /// step nor a forward jump.
    pub fn kind(&self, mover: Player) -> Option<MoveKind> {
        let (d_row, d_col) = self.deltas();
        let forward = mover.forward();
        if d_row == forward && d_col.abs() == 1 {
            Some(MoveKind::Step)
        } else if d_row == 2 * forward && d_col.abs() == 2 {
            Some(MoveKind::Jump)
        } else {
            None
        }
    }

    /// The square jumped over, for any move spanning two rows and two columns.
    pub fn midpoint(&self) -> Option<Position> {
        let (d_row, d_col) = self.deltas();
        if d_row.abs() == 2 && d_col.abs() == 2 {
            self.from.offset(d_row / 2, d_col / 2)
        } else {
            None
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

pub fn is_legal_move(board: &Board, mover: Player, mv: &Move) -> bool {
    if !board.get(mv.from).holds(mover) || !board.get(mv.to).is_empty() {
        return false;
    }
    match mv.kind(mover) {
        Some(MoveKind::Step) => true,
        Some(MoveKind::Jump) => mv
            .midpoint()
            .is_some_and(|mid| board.get(mid).holds(mover.opponent())),
        None => false,
    }
}

/// Moves the piece and clears the jumped square, if any. Legality is the
/// caller's concern.
pub fn apply_move(board: &Board, mv: &Move) -> Board {
    let mut next = board.clone();
    let piece = next.get(mv.from);
    next.set(mv.from, Cell::Empty);
    next.set(mv.to, piece);
    if let Some(mid) = mv.midpoint() {
        next.set(mid, Cell::Empty);
    }
    next
}

fn candidate_moves(from: Position, player: Player) -> impl Iterator<Item = Move> {
    let forward = player.forward();
    [(forward, -1), (forward, 1), (2 * forward, -2), (2 * forward, 2)]
        .into_iter()
        .filter_map(move |(d_row, d_col)| from.offset(d_row, d_col))
        .map(move |to| Move::new(from, to))
}

/// Every legal step and jump available to `player`, in board order.
pub fn legal_moves(board: &Board, player: Player) -> Vec<Move> {
    board
        .pieces(player)
        .flat_map(|from| candidate_moves(from, player))
        .filter(|mv| is_legal_move(board, player, mv))
        .collect()
}

pub fn has_any_legal_move(board: &Board, player: Player) -> bool {
    board
        .pieces(player)
        .flat_map(|from| candidate_moves(from, player))
        .any(|mv| is_legal_move(board, player, &mv))
}

pub fn has_any_jump(board: &Board, player: Player) -> bool {
    legal_moves(board, player)
        .iter()
        .any(|mv| mv.kind(player) == Some(MoveKind::Jump))
}

/// A side wins when its opponent has no pieces left, or when the side due to
/// move next has no legal move.
pub fn winner(board: &Board, to_move: Player) -> Option<Player> {
    if board.piece_count(to_move) == 0 {
        return Some(to_move.opponent());
    }
    if board.piece_count(to_move.opponent()) == 0 {
        return Some(to_move);
    }
    if !has_any_legal_move(board, to_move) {
        return Some(to_move.opponent());
    }
    None
}
