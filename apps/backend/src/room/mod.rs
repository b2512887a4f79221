//! The single game room: a pure state machine and the actor that serialises
//! access to it.

pub mod actor;
pub mod state;

#[cfg(test)]
mod tests_actor;

pub use actor::{
    CloseAll, DeclareWinner, GetStatus, Join, Leave, Reset, RoomActor, RoomStatus, Shutdown,
    SubmitMove,
};
pub use state::{ConnId, Delivery, EndReason, Phase, Room, RoomEvent, RoomFull, Slot};
