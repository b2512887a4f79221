//! Property tests for move legality (pure domain).
//!
//! - `legal_moves` agrees with a brute-force scan over every square pair
//! - applying a legal move never creates pieces
//! - jumps remove exactly one opponent piece, steps remove none
//! - forced capture narrows to jumps whenever one exists

use proptest::prelude::*;

use crate::domain::board::{Board, Player, Position};
use crate::domain::moves::{
    apply_move, has_any_jump, has_any_legal_move, is_legal_move, legal_moves, Move, MoveKind,
};
use crate::domain::rules::{permitted_moves, RuleSet};
use crate::domain::{test_gens, test_prelude};

fn brute_force_moves(board: &Board, player: Player) -> Vec<Move> {
    let mut found = Vec::new();
    for from in Position::all() {
        for to in Position::all() {
            let mv = Move::new(from, to);
            if is_legal_move(board, player, &mv) {
                found.push(mv);
            }
        }
    }
    found.sort_by_key(|m| (m.from, m.to));
    found
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: the candidate-based generator misses no legal move.
    #[test]
    fn prop_legal_moves_match_brute_force(
        board in test_gens::any_board(),
        player in test_gens::player(),
    ) {
        let mut generated = legal_moves(&board, player);
        generated.sort_by_key(|m| (m.from, m.to));
        let expected = brute_force_moves(&board, player);

        prop_assert_eq!(&generated, &expected);
        prop_assert_eq!(has_any_legal_move(&board, player), !expected.is_empty());
    }

    /// Property: every legal move is a forward step or a forward jump.
    #[test]
    fn prop_legal_moves_have_a_shape(
        board in test_gens::any_board(),
        player in test_gens::player(),
    ) {
        for mv in legal_moves(&board, player) {
            prop_assert!(mv.kind(player).is_some(), "{mv} has no shape for {player}");
            prop_assert!(mv.to.is_dark(), "{mv} lands on a light square");
        }
    }

    /// Property: steps keep both counts, jumps take exactly one opponent piece.
    #[test]
    fn prop_capture_counts(
        board in test_gens::any_board(),
        player in test_gens::player(),
    ) {
        let mine = board.piece_count(player);
        let theirs = board.piece_count(player.opponent());

        for mv in legal_moves(&board, player) {
            let after = apply_move(&board, &mv);
            prop_assert_eq!(after.piece_count(player), mine);
            let expected_theirs = match mv.kind(player) {
                Some(MoveKind::Jump) => theirs - 1,
                _ => theirs,
            };
            prop_assert_eq!(after.piece_count(player.opponent()), expected_theirs);
        }
    }

    /// Property: with forced capture, steps are only offered when no jump exists.
    #[test]
    fn prop_forced_capture_narrows(
        board in test_gens::any_board(),
        player in test_gens::player(),
    ) {
        let permitted = permitted_moves(&board, player, &RuleSet::default());
        if has_any_jump(&board, player) {
            prop_assert!(permitted
                .iter()
                .all(|m| m.kind(player) == Some(MoveKind::Jump)));
        } else {
            prop_assert_eq!(permitted, legal_moves(&board, player));
        }
    }

    /// Property: pieces stay on dark squares through play.
    #[test]
    fn prop_played_boards_stay_dark((board, _turn) in test_gens::played_board(60)) {
        for player in Player::ALL {
            for pos in board.pieces(player) {
                prop_assert!(pos.is_dark(), "{player} piece on light square {pos}");
            }
        }
        prop_assert!(board.piece_count(Player::One) <= 12);
        prop_assert!(board.piece_count(Player::Two) <= 12);
    }
}
