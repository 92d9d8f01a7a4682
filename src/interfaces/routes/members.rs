use actix_web::web;

use crate::handlers::{account, profiles, registration};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(registration::register);
    cfg.service(account::delete_account);

    // "/me" must be registered before the catch-all slug resource.
    cfg.service(
        web::scope("/profiles")
            .service(
                web::resource("")
                    .route(web::get().to(profiles::list_profiles)),
            )
            .service(
                web::resource("/cohorts")
                    .route(web::get().to(profiles::get_cohorts)),
            )
            .service(
                web::resource("/me")
                    .route(web::get().to(profiles::my_profile))
                    .route(web::put().to(profiles::update_my_profile)),
            )
            .service(
                web::resource("/{slug}")
                    .route(web::get().to(profiles::get_profile_by_slug)),
            ),
    );
}
