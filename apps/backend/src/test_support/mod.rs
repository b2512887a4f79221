//! A real relay bound to an ephemeral port, for integration tests here and
//! in the client package.
//!
//! Must run inside an actix system (`#[actix_web::test]`), since the room is
//! an actor.

use std::net::{SocketAddr, TcpListener};
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpServer};

use crate::config::Config;
use crate::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use crate::room::{GetStatus, RoomStatus};
use crate::routes;
use crate::state::app_state::AppState;

pub type TestResult<T> = Result<T, Box<dyn std::error::Error>>;

pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
    handle: ServerHandle,
    join: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn status(&self) -> TestResult<RoomStatus> {
        Ok(self.state.room().send(GetStatus).await?)
    }

    /// Polls the room until `expected` slots are occupied. Connection
    /// teardown is asynchronous, so tests use this after closing sockets.
    pub async fn wait_for_slots(&self, expected: usize, timeout: Duration) -> TestResult<()> {
        let start = tokio::time::Instant::now();
        loop {
            let occupied = self.status().await?.occupied_slots;
            if occupied == expected {
                return Ok(());
            }
            if start.elapsed() >= timeout {
                return Err(format!(
                    "timeout waiting for occupied_slots == {expected} (got {occupied})"
                )
                .into());
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
        let _ = self.join.await;
    }
}

pub async fn start_test_server(config: Config) -> TestResult<TestServer> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let state = AppState::start(config);
    let data = web::Data::new(state.clone());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .workers(1)
    .disable_signals()
    .listen(listener)?
    .run();

    let handle = server.handle();
    let join = actix_web::rt::spawn(server);

    Ok(TestServer {
        addr,
        state,
        handle,
        join,
    })
}
