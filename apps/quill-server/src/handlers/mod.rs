//! HTTP handlers and route configuration.

mod blog;
mod health;
mod posts;
mod views;


use actix_web::web;

use crate::middleware::rate_limit::RateLimitMiddleware;

/// Configure all application routes.
///
/// `share_guard` throttles share-form submissions per client.
pub fn configure_routes(cfg: &mut web::ServiceConfig, share_guard: RateLimitMiddleware) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Authoring routes
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::my_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/{id}", web::put().to(posts::update_post))
                    .route("/{id}/publish", web::post().to(posts::publish_post)),
            ),
    )
    .service(
        web::scope("/blog")
            .route("/", web::get().to(blog::post_list))
            .route(
                "/{year}/{month}/{day}/{slug}/",
                web::get().to(blog::post_detail),
            )
            .service(
                web::resource("/{id}/share/")
                    .wrap(share_guard)
                    .route(web::get().to(blog::share_form))
                    .route(web::post().to(blog::share_submit)),
            ),
    );
}
