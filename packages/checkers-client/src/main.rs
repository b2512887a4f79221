//! checkers-bot: plays random permitted moves against whoever else joins
//! the room, reconnecting when the connection drops.

use std::time::Duration;

use checkers_backend::domain::RuleSet;
use checkers_client::{Backoff, ClientState, RandomMover, Reconnector, SessionEnd};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "checkers-bot")]
#[command(about = "Headless random-move player for the checkers relay")]
struct Args {
    /// WebSocket endpoint of the relay
    #[arg(long, default_value = "ws://localhost:5232/ws")]
    url: String,

    /// Stop after this many finished games (plays until interrupted otherwise)
    #[arg(short, long)]
    games: Option<u32>,

    /// Seed for move selection, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Reconnect after a fixed delay instead of backing off exponentially
    #[arg(long)]
    fixed_delay_ms: Option<u64>,

    /// Give up after this many consecutive failed reconnect attempts
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Allow simple steps while a capture is available (must match the server)
    #[arg(long)]
    no_forced_capture: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let backoff = match args.fixed_delay_ms {
        Some(ms) => Backoff::fixed(Duration::from_millis(ms)),
        None => Backoff::exponential(),
    };
    let mut reconnector = Reconnector::new(args.url.clone(), backoff, CancellationToken::new());
    if let Some(max) = args.max_attempts {
        reconnector = reconnector.with_max_attempts(max);
    }

    let interrupt = reconnector.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, disconnecting");
            interrupt.cancel();
        }
    });

    let mut state = ClientState::new(RuleSet {
        forced_capture: !args.no_forced_capture,
    });
    let mut brain = RandomMover::new(args.seed).with_games(args.games);

    info!(url = %args.url, "Starting checkers bot");
    match reconnector.run(&mut state, &mut brain).await {
        Ok(SessionEnd::RoomFull) => {
            error!("Room is full, try again later");
            std::process::exit(2);
        }
        Ok(end) => {
            info!(?end, games_played = brain.games_played(), "Bot finished");
            Ok(())
        }
        Err(err) => {
            error!(error = %err, games_played = brain.games_played(), "Bot stopped");
            Err(err.into())
        }
    }
}
