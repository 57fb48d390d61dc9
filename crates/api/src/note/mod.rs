mod create_note;
mod delete_note;
mod get_note;
mod get_notes;
mod subscribers;
mod update_note;

use actix_web::web;
use create_note::create_note_controller;
use delete_note::delete_note_controller;
use get_note::get_note_controller;
use get_notes::get_notes_controller;
use update_note::update_note_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/user/{user_id}/notes",
        web::post().to(create_note_controller),
    );
    cfg.route("/user/{user_id}/notes", web::get().to(get_notes_controller));
    cfg.route(
        "/user/{user_id}/notes/{note_id}",
        web::get().to(get_note_controller),
    );
    cfg.route(
        "/user/{user_id}/notes/{note_id}",
        web::put().to(update_note_controller),
    );
    cfg.route(
        "/user/{user_id}/notes/{note_id}",
        web::delete().to(delete_note_controller),
    );
}
