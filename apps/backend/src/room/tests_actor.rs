// Room actor tests: routing through recipients and rejection reporting.

use actix::prelude::*;
use uuid::Uuid;

use crate::domain::board::{Player, Position};
use crate::domain::errors::Rejection;
use crate::domain::moves::Move;
use crate::domain::rules::{MoveRequest, RuleSet};
use crate::room::actor::{CloseAll, GetStatus, Join, Leave, RoomActor, Shutdown, SubmitMove};
use crate::room::state::{ConnId, Phase, RoomEvent, RoomFull};

/// Stand-in for a relay connection that records what it is sent.
#[derive(Default)]
struct Probe {
    events: Vec<RoomEvent>,
    shutdowns: usize,
}

impl Actor for Probe {
    type Context = Context<Self>;
}

impl Handler<RoomEvent> for Probe {
    type Result = ();

    fn handle(&mut self, msg: RoomEvent, _ctx: &mut Self::Context) {
        self.events.push(msg);
    }
}

impl Handler<Shutdown> for Probe {
    type Result = ();

    fn handle(&mut self, _msg: Shutdown, _ctx: &mut Self::Context) {
        self.shutdowns += 1;
    }
}

/// Returns and clears recorded events, plus the shutdown count.
#[derive(Message)]
#[rtype(result = "(Vec<RoomEvent>, usize)")]
struct Drain;

impl Handler<Drain> for Probe {
    type Result = MessageResult<Drain>;

    fn handle(&mut self, _msg: Drain, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult((std::mem::take(&mut self.events), self.shutdowns))
    }
}

struct Client {
    conn_id: ConnId,
    probe: Addr<Probe>,
}

impl Client {
    fn new() -> Self {
        Self {
            conn_id: Uuid::new_v4(),
            probe: Probe::default().start(),
        }
    }

    fn join_msg(&self) -> Join {
        Join {
            conn_id: self.conn_id,
            events: self.probe.clone().recipient(),
            shutdown: self.probe.clone().recipient(),
        }
    }

    async fn drain(&self) -> Vec<RoomEvent> {
        self.probe.send(Drain).await.expect("probe alive").0
    }
}

fn step(from: (u8, u8), to: (u8, u8)) -> MoveRequest {
    let p = |(r, c): (u8, u8)| Position::new(r, c).expect("in bounds");
    MoveRequest::Explicit(Move::new(p(from), p(to)))
}

fn room(report_rejections: bool) -> Addr<RoomActor> {
    RoomActor::new(RuleSet::default(), report_rejections).start()
}

#[actix_web::test]
async fn seats_two_players_and_starts() {
    let room = room(true);
    let a = Client::new();
    let b = Client::new();

    assert_eq!(room.send(a.join_msg()).await.unwrap(), Ok(Player::One));
    assert_eq!(room.send(b.join_msg()).await.unwrap(), Ok(Player::Two));

    assert_eq!(
        a.drain().await,
        vec![
            RoomEvent::Assigned { player: Player::One },
            RoomEvent::WaitingForOpponent,
            RoomEvent::StartGame,
        ]
    );
    assert_eq!(
        b.drain().await,
        vec![RoomEvent::Assigned { player: Player::Two }, RoomEvent::StartGame]
    );

    let status = room.send(GetStatus).await.unwrap();
    assert_eq!(status.phase, Phase::InProgress);
    assert_eq!(status.occupied_slots, 2);
}

#[actix_web::test]
async fn third_connection_gets_room_full() {
    let room = room(true);
    let a = Client::new();
    let b = Client::new();
    let c = Client::new();
    room.send(a.join_msg()).await.unwrap().unwrap();
    room.send(b.join_msg()).await.unwrap().unwrap();

    assert_eq!(room.send(c.join_msg()).await.unwrap(), Err(RoomFull));
    assert!(c.drain().await.is_empty());

    // The refused connection was never registered, so closing it is harmless.
    room.send(Leave { conn_id: c.conn_id }).await.unwrap();
    assert_eq!(room.send(GetStatus).await.unwrap().occupied_slots, 2);
}

#[actix_web::test]
async fn rejection_is_reported_to_the_sender_only() {
    let room = room(true);
    let a = Client::new();
    let b = Client::new();
    room.send(a.join_msg()).await.unwrap().unwrap();
    room.send(b.join_msg()).await.unwrap().unwrap();
    a.drain().await;
    b.drain().await;

    let result = room
        .send(SubmitMove {
            conn_id: b.conn_id,
            request: step((2, 1), (3, 0)),
        })
        .await
        .unwrap();

    assert_eq!(result, Err(Rejection::NotYourTurn));
    assert_eq!(
        b.drain().await,
        vec![RoomEvent::MoveRejected {
            reason: Rejection::NotYourTurn
        }]
    );
    assert!(a.drain().await.is_empty());
}

#[actix_web::test]
async fn rejection_is_silent_when_reporting_is_off() {
    let room = room(false);
    let a = Client::new();
    let b = Client::new();
    room.send(a.join_msg()).await.unwrap().unwrap();
    room.send(b.join_msg()).await.unwrap().unwrap();
    a.drain().await;

    let result = room
        .send(SubmitMove {
            conn_id: a.conn_id,
            request: step((5, 0), (3, 0)),
        })
        .await
        .unwrap();

    assert_eq!(result, Err(Rejection::IllegalMove));
    assert!(a.drain().await.is_empty());
}

#[actix_web::test]
async fn accepted_move_reaches_the_opponent() {
    let room = room(true);
    let a = Client::new();
    let b = Client::new();
    room.send(a.join_msg()).await.unwrap().unwrap();
    room.send(b.join_msg()).await.unwrap().unwrap();
    a.drain().await;
    b.drain().await;

    room.send(SubmitMove {
        conn_id: a.conn_id,
        request: step((5, 0), (4, 1)),
    })
    .await
    .unwrap()
    .unwrap();

    assert!(a.drain().await.is_empty());
    let events = b.drain().await;
    assert!(matches!(
        events.as_slice(),
        [RoomEvent::OpponentMove {
            current_player: Player::Two,
            ..
        }]
    ));
}

#[actix_web::test]
async fn leave_then_rejoin() {
    let room = room(true);
    let a = Client::new();
    let b = Client::new();
    room.send(a.join_msg()).await.unwrap().unwrap();
    room.send(b.join_msg()).await.unwrap().unwrap();
    b.drain().await;

    room.send(Leave { conn_id: a.conn_id }).await.unwrap();
    assert_eq!(
        b.drain().await,
        vec![
            RoomEvent::PlayerDisconnected { player: Player::One },
            RoomEvent::WaitingForOpponent,
        ]
    );

    let c = Client::new();
    assert_eq!(room.send(c.join_msg()).await.unwrap(), Ok(Player::One));
    assert_eq!(b.drain().await, vec![RoomEvent::StartGame]);
}

#[actix_web::test]
async fn close_all_reaches_every_connection() {
    let room = room(true);
    let a = Client::new();
    let b = Client::new();
    room.send(a.join_msg()).await.unwrap().unwrap();
    room.send(b.join_msg()).await.unwrap().unwrap();

    assert_eq!(room.send(CloseAll).await.unwrap(), 2);

    let (_, a_shutdowns) = a.probe.send(Drain).await.unwrap();
    let (_, b_shutdowns) = b.probe.send(Drain).await.unwrap();
    assert_eq!((a_shutdowns, b_shutdowns), (1, 1));
}
