use actix_web::web;

use crate::handlers::assistant::token_gpt_handler;

pub fn configure_assistant_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/token-gpt", web::post().to(token_gpt_handler));
}
