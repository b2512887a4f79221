//! Property tests for turn flow through the rule engine.
//!
//! - accepted moves always hand the turn to the opponent
//! - the side not on turn is always refused
//! - a snapshot of a permitted move infers back to that move
//! - a reported winner agrees with `winner` on the resulting board

use proptest::prelude::*;
use proptest::sample::Index;

use crate::domain::board::Player;
use crate::domain::errors::Rejection;
use crate::domain::moves::{apply_move, winner};
use crate::domain::rules::{infer_move, permitted_moves, try_move, GameView, RuleSet};
use crate::domain::{test_gens, test_prelude};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: after n accepted moves from the opening, the side to move is
    /// player 1 when n is even and player 2 when n is odd.
    #[test]
    fn prop_turns_alternate(picks in proptest::collection::vec(any::<Index>(), 0..50)) {
        let rules = RuleSet::default();
        let mut board = crate::domain::board::Board::initial();
        let mut turn = Player::One;
        let mut accepted = 0usize;

        for pick in picks {
            let options = permitted_moves(&board, turn, &rules);
            if options.is_empty() {
                break;
            }
            let mv = options[pick.index(options.len())];
            let view = GameView { board: &board, turn, in_progress: true };
            let applied = try_move(&view, turn, mv, &rules).expect("permitted move accepted");
            prop_assert_eq!(applied.next_turn, turn.opponent());

            board = applied.board;
            turn = applied.next_turn;
            accepted += 1;

            let expected = if accepted % 2 == 0 { Player::One } else { Player::Two };
            prop_assert_eq!(turn, expected);

            if applied.winner.is_some() {
                break;
            }
        }
    }

    /// Property: the player not on turn is refused, whatever they submit.
    #[test]
    fn prop_off_turn_refused(
        (board, turn) in test_gens::played_board(30),
        pick in any::<Index>(),
    ) {
        let rules = RuleSet::default();
        let other = turn.opponent();
        let view = GameView { board: &board, turn, in_progress: true };
        let options = permitted_moves(&board, other, &rules);
        prop_assume!(!options.is_empty());

        let mv = options[pick.index(options.len())];
        prop_assert_eq!(try_move(&view, other, mv, &rules), Err(Rejection::NotYourTurn));
    }

    /// Property: inferring from the resulting snapshot recovers the move.
    #[test]
    fn prop_snapshot_inference_recovers_move(
        (board, turn) in test_gens::played_board(30),
        pick in any::<Index>(),
    ) {
        let options = permitted_moves(&board, turn, &RuleSet::default());
        prop_assume!(!options.is_empty());

        let mv = options[pick.index(options.len())];
        let after = apply_move(&board, &mv);
        prop_assert_eq!(infer_move(&board, &after, turn), Ok(mv));
    }

    /// Property: the winner on an accepted move is the one `winner` computes
    /// for the resulting board with the opponent to move.
    #[test]
    fn prop_reported_winner_matches_board(
        (board, turn) in test_gens::played_board(60),
        pick in any::<Index>(),
    ) {
        let rules = RuleSet::default();
        let options = permitted_moves(&board, turn, &rules);
        prop_assume!(!options.is_empty());

        let mv = options[pick.index(options.len())];
        let view = GameView { board: &board, turn, in_progress: true };
        let applied = try_move(&view, turn, mv, &rules).expect("permitted move accepted");
        prop_assert_eq!(applied.winner, winner(&applied.board, turn.opponent()));
    }
}
