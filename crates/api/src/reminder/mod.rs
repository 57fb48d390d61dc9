mod deliver;
pub mod dispatch_reminders;
mod fallback_timer;

use actix_web::web;
use dispatch_reminders::dispatch_reminders_controller;
pub use fallback_timer::{cancel_fallback_timer, sync_fallback_timer};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/reminders/dispatch",
        web::post().to(dispatch_reminders_controller),
    );
}
