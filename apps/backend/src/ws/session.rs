use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::board::Player;
use crate::errors::ErrorCode;
use crate::room::{
    ConnId, DeclareWinner, Join, Leave, Reset, RoomActor, RoomEvent, Shutdown, SubmitMove,
};
use crate::state::app_state::AppState;
use crate::ws::protocol::{move_request, ClientMsg, ServerMsg};

const ROOM_FULL_REASON: &str = "Room is full";

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let config = app_state.config();
    let session = WsSession::new(
        Uuid::new_v4(),
        app_state.room(),
        config.heartbeat_interval,
        config.client_timeout,
        config.report_rejections,
    );
    ws::start(session, &req, stream)
}

/// One player's connection. Relays frames into the room and room events back
/// out; the room never sees the socket itself.
pub struct WsSession {
    conn_id: ConnId,
    room: Addr<RoomActor>,
    player: Option<Player>,

    heartbeat_interval: Duration,
    client_timeout: Duration,
    report_rejections: bool,

    last_heartbeat: Instant,
    heartbeat_handle: Option<actix::SpawnHandle>,
}

impl WsSession {
    fn new(
        conn_id: ConnId,
        room: Addr<RoomActor>,
        heartbeat_interval: Duration,
        client_timeout: Duration,
        report_rejections: bool,
    ) -> Self {
        Self {
            conn_id,
            room,
            player: None,
            heartbeat_interval,
            client_timeout,
            report_rejections,
            last_heartbeat: Instant::now(),
            heartbeat_handle: None,
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn start_heartbeat(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let handle = ctx.run_interval(self.heartbeat_interval, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > actor.client_timeout {
                warn!(
                    conn_id = %actor.conn_id,
                    player = ?actor.player.map(Player::number),
                    "[WS SESSION] heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
        self.heartbeat_handle = Some(handle);
    }

    fn join_room(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let join = Join {
            conn_id: self.conn_id,
            events: ctx.address().recipient(),
            shutdown: ctx.address().recipient(),
        };

        // Hold other mailbox traffic until the seat is known so the
        // playerNumber frame always precedes anything the room sends next.
        self.room
            .send(join)
            .into_actor(self)
            .map(|res, actor, ctx| match res {
                Ok(Ok(player)) => {
                    actor.player = Some(player);
                }
                Ok(Err(_room_full)) => {
                    Self::send_json(ctx, &ServerMsg::RoomFull);
                    ctx.close(Some(ws::CloseReason {
                        code: ws::CloseCode::Normal,
                        description: Some(ROOM_FULL_REASON.to_string()),
                    }));
                    ctx.stop();
                }
                Err(err) => {
                    error!(
                        conn_id = %actor.conn_id,
                        error = %err,
                        code = %ErrorCode::RoomUnavailable,
                        "[WS SESSION] room did not answer join"
                    );
                    ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                    ctx.stop();
                }
            })
            .wait(ctx);
    }

    fn handle_text(&mut self, text: &str, ctx: &mut ws::WebsocketContext<Self>) {
        let cmd = match serde_json::from_str::<ClientMsg>(text) {
            Ok(cmd) => cmd,
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    error = %err,
                    code = %ErrorCode::MalformedMessage,
                    "[WS SESSION] ignoring malformed frame"
                );
                return;
            }
        };
        debug!(conn_id = %self.conn_id, message = ?cmd, "[WS SESSION] inbound");

        match cmd {
            ClientMsg::Move {
                board,
                from_row,
                from_col,
                to_row,
                to_col,
            } => match move_request(board, from_row, from_col, to_row, to_col) {
                Ok(request) => self.room.do_send(SubmitMove {
                    conn_id: self.conn_id,
                    request,
                }),
                Err(reason) => {
                    warn!(
                        conn_id = %self.conn_id,
                        code = %reason.code(),
                        "[WS SESSION] move frame carried no usable move"
                    );
                    if self.report_rejections {
                        let rejected = ServerMsg::from(RoomEvent::MoveRejected { reason });
                        Self::send_json(ctx, &rejected);
                    }
                }
            },
            ClientMsg::ResetGame => self.room.do_send(Reset {
                conn_id: self.conn_id,
            }),
            ClientMsg::GameEnd { winner } => self.room.do_send(DeclareWinner {
                conn_id: self.conn_id,
                winner,
            }),
        }
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, "[WS SESSION] started");
        self.start_heartbeat(ctx);
        self.join_room(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.room.do_send(Leave {
            conn_id: self.conn_id,
        });
        info!(
            conn_id = %self.conn_id,
            player = ?self.player.map(Player::number),
            "[WS SESSION] stopped"
        );
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                self.handle_text(&text, ctx);
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                debug!(conn_id = %self.conn_id, "[WS SESSION] ignoring binary frame");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<RoomEvent> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: RoomEvent, ctx: &mut Self::Context) -> Self::Result {
        Self::send_json(ctx, &ServerMsg::from(msg));
    }
}

impl Handler<Shutdown> for WsSession {
    type Result = ();

    fn handle(&mut self, _msg: Shutdown, ctx: &mut Self::Context) -> Self::Result {
        if let Some(handle) = self.heartbeat_handle.take() {
            ctx.cancel_future(handle);
        }
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Away)));
        ctx.stop();
    }
}
