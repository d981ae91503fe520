pub mod db;
pub mod entities;
pub mod error;
pub mod extractor;
pub mod filters;
pub mod models;
pub mod pagination;
pub mod permissions;
pub mod repository;
pub mod routes;
pub mod state;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the HTTP router for the whole API.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Auth
        .route("/api/register", post(routes::auth::register))
        .route("/api/login", post(routes::auth::login))
        .route("/api/logout", post(routes::auth::logout))
        .route("/api/me", get(routes::auth::get_me))
        // Feeds
        .route(
            "/api/feeds",
            get(routes::feeds::list_feeds).post(routes::feeds::create_feed),
        )
        .route("/api/feeds/{feed_id}", get(routes::feeds::get_feed))
        // Comments
        .route(
            "/api/feeds/{feed_id}/comments",
            get(routes::comments::list_comments).post(routes::comments::create_comment),
        )
        .route(
            "/api/comments/{comment_id}",
            get(routes::comments::get_comment).put(routes::comments::update_comment),
        )
        // Emotions
        .route(
            "/api/feeds/{feed_id}/emotions",
            get(routes::emotions::list_emotions).post(routes::emotions::create_emotion),
        )
        .route(
            "/api/feeds/{feed_id}/emotions/{emotion_id}",
            put(routes::emotions::update_emotion).delete(routes::emotions::delete_emotion),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        // State
        .with_state(state)
}
