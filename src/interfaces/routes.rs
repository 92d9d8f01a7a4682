use actix_web::web;

use crate::handlers::home::home;
use crate::handlers::system::health_check;

mod admin;
mod articles;
mod auth;
mod json_error;
mod members;
mod uploads;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(health_check);

    cfg.service(
        web::scope("/api/v1")
            .configure(auth::config_routes)
            .configure(admin::config_routes)
            .configure(members::config_routes)
            .configure(articles::config_routes)
            .configure(uploads::config_routes),
    );

    cfg.configure(json_error::config_routes);
}
