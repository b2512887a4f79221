//! The authoritative rule engine.
//!
//! Everything here is pure: the room hands in a view of its state and gets
//! back either a rejection or the state it should adopt.

use crate::domain::board::{Board, Cell, Player, Position};
use crate::domain::errors::Rejection;
use crate::domain::moves::{self, Move, MoveKind};

/// Tunable rules for a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    /// When a jump is available to the mover, simple steps are refused.
    pub forced_capture: bool,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            forced_capture: true,
        }
    }
}

/// Read-only view of the room state the engine needs.
#[derive(Debug, Clone, Copy)]
pub struct GameView<'a> {
    pub board: &'a Board,
    pub turn: Player,
    pub in_progress: bool,
}

/// What a participant asked for: explicit coordinates, or the board they
/// believe results from their move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveRequest {
    Explicit(Move),
    Snapshot(Board),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    pub mover: Player,
    pub mv: Move,
    pub kind: MoveKind,
    pub captured: Option<Position>,
    pub board: Board,
    pub next_turn: Player,
    /// Winner computed from `board` with `next_turn` to move.
    pub winner: Option<Player>,
}

/// Checks that `requester` may act at all right now.
pub fn ensure_can_act(view: &GameView<'_>, requester: Player) -> Result<(), Rejection> {
    if !view.in_progress {
        return Err(Rejection::GameNotInProgress);
    }
    if requester != view.turn {
        return Err(Rejection::NotYourTurn);
    }
    Ok(())
}

/// Moves `player` may make under `rules`: all legal moves, narrowed to jumps
/// when capture is forced and one exists.
pub fn permitted_moves(board: &Board, player: Player, rules: &RuleSet) -> Vec<Move> {
    let legal = moves::legal_moves(board, player);
    if !rules.forced_capture {
        return legal;
    }
    let jumps: Vec<Move> = legal
        .iter()
        .copied()
        .filter(|mv| mv.kind(player) == Some(MoveKind::Jump))
        .collect();
    if jumps.is_empty() {
        legal
    } else {
        jumps
    }
}

pub fn try_move(
    view: &GameView<'_>,
    requester: Player,
    mv: Move,
    rules: &RuleSet,
) -> Result<AppliedMove, Rejection> {
    ensure_can_act(view, requester)?;

    if !moves::is_legal_move(view.board, requester, &mv) {
        return Err(Rejection::IllegalMove);
    }
    let kind = mv.kind(requester).ok_or(Rejection::IllegalMove)?;

    if rules.forced_capture
        && kind == MoveKind::Step
        && moves::has_any_jump(view.board, requester)
    {
        return Err(Rejection::JumpRequired);
    }

    let board = moves::apply_move(view.board, &mv);
    let next_turn = requester.opponent();
    let winner = moves::winner(&board, next_turn);

    Ok(AppliedMove {
        mover: requester,
        mv,
        kind,
        captured: match kind {
            MoveKind::Jump => mv.midpoint(),
            MoveKind::Step => None,
        },
        board,
        next_turn,
        winner,
    })
}

/// Derives the single move that turns `before` into `after` for `mover`.
///
/// Exactly one of the mover's pieces must vacate a square and exactly one must
/// appear; at most one opponent piece may disappear. The resulting board must
/// be precisely what applying that move produces.
pub fn infer_move(before: &Board, after: &Board, mover: Player) -> Result<Move, Rejection> {
    let mut vacated = Vec::new();
    let mut arrived = Vec::new();
    let mut removed = 0usize;

    for pos in Position::all() {
        match (before.get(pos), after.get(pos)) {
            (a, b) if a == b => {}
            (Cell::Occupied(p), Cell::Empty) if p == mover => vacated.push(pos),
            (Cell::Empty, Cell::Occupied(p)) if p == mover => arrived.push(pos),
            (Cell::Occupied(p), Cell::Empty) if p == mover.opponent() => removed += 1,
            _ => return Err(Rejection::IllegalMove),
        }
    }

    let (&[from], &[to]) = (vacated.as_slice(), arrived.as_slice()) else {
        return Err(Rejection::IllegalMove);
    };
    if removed > 1 {
        return Err(Rejection::IllegalMove);
    }

    let mv = Move::new(from, to);
    if moves::apply_move(before, &mv) != *after {
        return Err(Rejection::IllegalMove);
    }
    Ok(mv)
}

/// Turns a request into a concrete move against the current board.
pub fn resolve_request(
    board: &Board,
    mover: Player,
    request: &MoveRequest,
) -> Result<Move, Rejection> {
    match request {
        MoveRequest::Explicit(mv) => Ok(*mv),
        MoveRequest::Snapshot(after) => infer_move(board, after, mover),
    }
}
