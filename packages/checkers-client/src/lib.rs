//! Headless client for the checkers relay.
//!
//! [`ClientState`] keeps an optimistic copy of the game and turns player
//! intents into outbound frames. [`Reconnector`] owns the socket, feeds
//! server frames into the state and asks a [`Brain`] what to do next.

pub mod backoff;
pub mod bot;
pub mod connection;
pub mod error;
pub mod state;

pub use backoff::Backoff;
pub use bot::RandomMover;
pub use connection::{Brain, Reconnector, SessionEnd};
pub use error::{ClientError, IntentError};
pub use state::{ClientState, Status};
