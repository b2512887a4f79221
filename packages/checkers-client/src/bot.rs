//! A brain that plays uniformly random permitted moves.

use checkers_backend::domain::Player;
use checkers_backend::ws::protocol::{ClientMsg, ServerMsg};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::connection::Brain;
use crate::state::ClientState;

/// Rejections in a row after which the bot stops. The bot only plays moves
/// it considers permitted, so repeated rejections mean its rules disagree
/// with the server's.
pub const MAX_CONSECUTIVE_REJECTIONS: u32 = 3;

pub struct RandomMover {
    rng: StdRng,
    games_wanted: Option<u32>,
    games_played: u32,
    consecutive_rejections: u32,
}

impl RandomMover {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            rng,
            games_wanted: None,
            games_played: 0,
            consecutive_rejections: 0,
        }
    }

    /// Stop after `games` finished games. `None` plays until cancelled.
    pub fn with_games(mut self, games: Option<u32>) -> Self {
        self.games_wanted = games;
        self
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    fn reached_goal(&self) -> bool {
        self.games_wanted
            .is_some_and(|wanted| self.games_played >= wanted)
    }

    fn pick_move(&mut self, state: &mut ClientState) -> Option<ClientMsg> {
        let mv = *state.my_moves().choose(&mut self.rng)?;
        state.intent_move(mv.from, mv.to).ok()
    }
}

impl Brain for RandomMover {
    fn react(&mut self, event: &ServerMsg, state: &mut ClientState) -> Option<ClientMsg> {
        match event {
            ServerMsg::GameEnd { winner } => {
                self.games_played += 1;
                info!(
                    winner = winner.number(),
                    me = state.player().map(Player::number),
                    games_played = self.games_played,
                    "[BOT] game over"
                );
                // Player one starts the next game so both sides don't reset.
                if state.player() == Some(Player::One) && !self.reached_goal() {
                    return state.intent_reset().ok();
                }
                return None;
            }
            ServerMsg::MoveRejected { reason } => {
                self.consecutive_rejections += 1;
                warn!(
                    reason = reason.as_str(),
                    consecutive = self.consecutive_rejections,
                    "[BOT] move rejected"
                );
            }
            ServerMsg::OpponentMove { .. } | ServerMsg::StartGame | ServerMsg::ResetGame => {
                self.consecutive_rejections = 0;
            }
            _ => {}
        }

        if state.is_my_turn() && self.consecutive_rejections < MAX_CONSECUTIVE_REJECTIONS {
            self.pick_move(state)
        } else {
            None
        }
    }

    fn is_done(&self, _state: &ClientState) -> bool {
        self.reached_goal() || self.consecutive_rejections >= MAX_CONSECUTIVE_REJECTIONS
    }
}
