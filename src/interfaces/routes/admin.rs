use actix_web::web;

use crate::handlers::admin;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(admin::approve)
            .service(admin::reject)
            .service(admin::pending_profiles),
    );
}
