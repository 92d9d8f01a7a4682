use actix_web::web;

use crate::handlers::articles;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/articles")
            .service(
                web::resource("")
                    .route(web::post().to(articles::create_article))
                    .route(web::get().to(articles::get_all_articles)),
            )
            .service(
                web::resource("/author/{author_id}")
                    .route(web::get().to(articles::get_articles_by_author)),
            )
            .service(
                web::resource("/{article_id}")
                    .route(web::get().to(articles::get_article_by_id))
                    .route(web::patch().to(articles::update_article))
                    .route(web::delete().to(articles::delete_article)),
            )
            .service(
                web::resource("/{article_id}/related")
                    .route(web::get().to(articles::get_related_articles)),
            ),
    );
}
