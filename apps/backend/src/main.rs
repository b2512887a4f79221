use actix_web::{web, App, HttpServer};
use checkers_backend::config::Config;
use checkers_backend::middleware::{cors_middleware, RequestTrace, StructuredLogger, TraceSpan};
use checkers_backend::room::CloseAll;
use checkers_backend::routes;
use checkers_backend::state::app_state::AppState;
use tracing::{error, info, warn};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let (host, port) = config.bind_addr();
    info!(
        host = %host,
        port,
        forced_capture = config.rules.forced_capture,
        report_rejections = config.report_rejections,
        "starting checkers relay"
    );

    let app_state = AppState::start(config.clone());
    let room = app_state.room();
    let origins = config.cors_allowed_origins.clone();
    let data = web::Data::new(app_state);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&origins))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .shutdown_timeout(config.shutdown_timeout.as_secs())
    .disable_signals()
    .bind((host.as_str(), port))?
    .run();

    // Close player connections before the listener so both players see a
    // clean close frame instead of a dropped socket.
    let handle = server.handle();
    actix_web::rt::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for shutdown signal");
            return;
        }
        match room.send(CloseAll).await {
            Ok(closed) => info!(connections = closed, "shutdown requested"),
            Err(e) => warn!(error = %e, "room unavailable during shutdown"),
        }
        handle.stop(true).await;
    });

    server.await
}
