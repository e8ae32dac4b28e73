//! HTTP handlers and route configuration.

mod authoring;
mod comments;
mod forms;
mod health;
mod posts;
mod share;

#[cfg(test)]
mod tests;

use actix_web::web;

/// Configure all application routes.
///
/// Public routes live at the root and mirror the canonical post paths; the
/// tag listing is registered ahead of the parameterized matchers so
/// `/tag/...` never binds as a post id. Authoring endpoints sit under `/api`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(web::resource("/posts").route(web::post().to(authoring::create_post)))
            .service(
                web::resource("/posts/{post_id}")
                    .route(web::put().to(authoring::update_post))
                    .route(web::delete().to(authoring::delete_post)),
            )
            .service(
                web::resource("/comments/{comment_id}")
                    .route(web::patch().to(authoring::moderate_comment)),
            ),
    )
    .service(web::resource("/").route(web::get().to(posts::list_posts)))
    .service(web::resource("/tag/{tag_slug}/").route(web::get().to(posts::list_posts_by_tag)))
    .service(web::resource("/{post_id}/share/").route(web::post().to(share::share_post)))
    .service(web::resource("/{post_id}/comment/").route(web::post().to(comments::submit_comment)))
    .service(
        web::resource("/{year}/{month}/{day}/{slug}").route(web::get().to(posts::post_detail)),
    );
}
