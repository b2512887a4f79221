use actix_web::web;

pub mod health;
pub mod realtime;

/// Registers every route. `main.rs` and the test server share this so both
/// expose the same paths.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::root))
        .configure(health::configure_routes)
        .configure(realtime::configure_routes);
}
