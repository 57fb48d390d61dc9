mod create_push_subscription;
mod delete_push_subscription;
mod get_push_subscriptions;

use actix_web::web;
use create_push_subscription::create_push_subscription_controller;
use delete_push_subscription::delete_push_subscription_controller;
use get_push_subscriptions::get_push_subscriptions_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/user/{user_id}/push-subscriptions",
        web::post().to(create_push_subscription_controller),
    );
    cfg.route(
        "/user/{user_id}/push-subscriptions",
        web::get().to(get_push_subscriptions_controller),
    );
    cfg.route(
        "/user/{user_id}/push-subscriptions/{subscription_id}",
        web::delete().to(delete_push_subscription_controller),
    );
}
