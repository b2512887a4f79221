use actix_web::web;

use crate::ws::session;

/// `GET /ws` upgrades to the player connection.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/ws", web::get().to(session::upgrade));
}
