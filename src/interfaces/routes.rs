use actix_web::web;

use crate::handlers::home::home;

mod admin;
mod auth;
mod json_error;
mod public;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.configure(public::config_routes);
    cfg.configure(auth::config_routes);
    cfg.configure(admin::config_routes);

    cfg.configure(json_error::config_routes);
}
