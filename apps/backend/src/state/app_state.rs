use actix::{Actor, Addr};

use crate::config::Config;
use crate::room::RoomActor;

/// Shared by every worker: the address of the single room and the config it
/// was started with.
#[derive(Clone)]
pub struct AppState {
    room: Addr<RoomActor>,
    config: Config,
}

impl AppState {
    /// Starts the room actor on the current arbiter. Must be called inside a
    /// running actix system.
    pub fn start(config: Config) -> Self {
        let room = RoomActor::new(config.rules, config.report_rejections).start();
        Self { room, config }
    }

    pub fn room(&self) -> Addr<RoomActor> {
        self.room.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
