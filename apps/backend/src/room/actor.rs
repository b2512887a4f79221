//! Actor owning the single room. Every mutation arrives as a mailbox message
//! and is handled one at a time, so slot assignment and turn order are
//! linearizable without locks.

use std::collections::HashMap;

use actix::prelude::*;
use tracing::{debug, info, warn};

use crate::domain::board::{Board, Player};
use crate::domain::errors::Rejection;
use crate::domain::rules::{MoveRequest, RuleSet};
use crate::room::state::{ConnId, Outbox, Phase, Room, RoomEvent, RoomFull};

/// Asks a relay connection to close itself.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Shutdown;

#[derive(Message)]
#[rtype(result = "Result<Player, RoomFull>")]
pub struct Join {
    pub conn_id: ConnId,
    pub events: Recipient<RoomEvent>,
    pub shutdown: Recipient<Shutdown>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Leave {
    pub conn_id: ConnId,
}

#[derive(Message)]
#[rtype(result = "Result<(), Rejection>")]
pub struct SubmitMove {
    pub conn_id: ConnId,
    pub request: MoveRequest,
}

#[derive(Message)]
#[rtype(result = "Result<(), Rejection>")]
pub struct Reset {
    pub conn_id: ConnId,
}

#[derive(Message)]
#[rtype(result = "Result<(), Rejection>")]
pub struct DeclareWinner {
    pub conn_id: ConnId,
    pub winner: Player,
}

#[derive(Message)]
#[rtype(result = "RoomStatus")]
pub struct GetStatus;

/// Stops every connected relay. Returns how many were asked.
#[derive(Message)]
#[rtype(result = "usize")]
pub struct CloseAll;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomStatus {
    pub phase: Phase,
    pub turn: Player,
    pub board: Board,
    pub occupied_slots: usize,
}

struct Connection {
    events: Recipient<RoomEvent>,
    shutdown: Recipient<Shutdown>,
}

pub struct RoomActor {
    room: Room,
    connections: HashMap<ConnId, Connection>,
    report_rejections: bool,
}

impl RoomActor {
    pub fn new(rules: RuleSet, report_rejections: bool) -> Self {
        Self {
            room: Room::new(rules),
            connections: HashMap::new(),
            report_rejections,
        }
    }

    /// Best-effort: a connection that has already gone away is skipped.
    fn deliver(&self, outbox: Outbox) {
        for delivery in outbox {
            match self.connections.get(&delivery.to) {
                Some(conn) => conn.events.do_send(delivery.event),
                None => debug!(conn_id = %delivery.to, "[ROOM] dropping event for unknown connection"),
            }
        }
    }

    fn settle(
        &self,
        conn_id: ConnId,
        action: &'static str,
        result: Result<Outbox, Rejection>,
    ) -> Result<(), Rejection> {
        match result {
            Ok(outbox) => {
                debug!(
                    conn_id = %conn_id,
                    action,
                    phase = self.room.phase().as_str(),
                    turn = %self.room.turn(),
                    "[ROOM] accepted"
                );
                self.deliver(outbox);
                Ok(())
            }
            Err(reason) => {
                warn!(
                    conn_id = %conn_id,
                    action,
                    reason = %reason,
                    code = %reason.code(),
                    "[ROOM] rejected"
                );
                if self.report_rejections {
                    if let Some(conn) = self.connections.get(&conn_id) {
                        conn.events.do_send(RoomEvent::MoveRejected { reason });
                    }
                }
                Err(reason)
            }
        }
    }
}

impl Actor for RoomActor {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!(
            forced_capture = self.room.rules().forced_capture,
            report_rejections = self.report_rejections,
            "[ROOM] started"
        );
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!("[ROOM] stopped");
    }
}

impl Handler<Join> for RoomActor {
    type Result = Result<Player, RoomFull>;

    fn handle(&mut self, msg: Join, _ctx: &mut Self::Context) -> Self::Result {
        let (player, outbox) = self.room.join(msg.conn_id).inspect_err(|_| {
            info!(conn_id = %msg.conn_id, "[ROOM] refused connection, room is full");
        })?;

        self.connections.insert(
            msg.conn_id,
            Connection {
                events: msg.events,
                shutdown: msg.shutdown,
            },
        );
        info!(
            conn_id = %msg.conn_id,
            player = %player,
            phase = self.room.phase().as_str(),
            "[ROOM] seated"
        );
        self.deliver(outbox);
        Ok(player)
    }
}

impl Handler<Leave> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: Leave, _ctx: &mut Self::Context) -> Self::Result {
        let player = self.room.player_of(msg.conn_id);
        let outbox = self.room.leave(msg.conn_id);
        self.connections.remove(&msg.conn_id);

        if let Some(player) = player {
            info!(
                conn_id = %msg.conn_id,
                player = %player,
                phase = self.room.phase().as_str(),
                "[ROOM] slot freed"
            );
        }
        self.deliver(outbox);
    }
}

impl Handler<SubmitMove> for RoomActor {
    type Result = Result<(), Rejection>;

    fn handle(&mut self, msg: SubmitMove, _ctx: &mut Self::Context) -> Self::Result {
        let result = self.room.submit_move(msg.conn_id, &msg.request);
        if let Phase::Finished { winner, reason } = self.room.phase() {
            if result.is_ok() {
                info!(winner = %winner, reason = ?reason, "[ROOM] game over");
            }
        }
        self.settle(msg.conn_id, "move", result)
    }
}

impl Handler<Reset> for RoomActor {
    type Result = Result<(), Rejection>;

    fn handle(&mut self, msg: Reset, _ctx: &mut Self::Context) -> Self::Result {
        let result = self.room.reset(msg.conn_id);
        self.settle(msg.conn_id, "reset", result)
    }
}

impl Handler<DeclareWinner> for RoomActor {
    type Result = Result<(), Rejection>;

    fn handle(&mut self, msg: DeclareWinner, _ctx: &mut Self::Context) -> Self::Result {
        let result = self.room.declare_winner(msg.conn_id, msg.winner);
        if result.is_ok() {
            info!(conn_id = %msg.conn_id, winner = %msg.winner, "[ROOM] game over by declaration");
        }
        self.settle(msg.conn_id, "game_end", result)
    }
}

impl Handler<GetStatus> for RoomActor {
    type Result = MessageResult<GetStatus>;

    fn handle(&mut self, _msg: GetStatus, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(RoomStatus {
            phase: self.room.phase(),
            turn: self.room.turn(),
            board: self.room.board().clone(),
            occupied_slots: self.room.occupied_slots(),
        })
    }
}

impl Handler<CloseAll> for RoomActor {
    type Result = MessageResult<CloseAll>;

    fn handle(&mut self, _msg: CloseAll, _ctx: &mut Self::Context) -> Self::Result {
        for conn in self.connections.values() {
            conn.shutdown.do_send(Shutdown);
        }
        info!(connections = self.connections.len(), "[ROOM] closing all connections");
        MessageResult(self.connections.len())
    }
}
