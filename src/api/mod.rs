/// API routes and handlers
pub mod dashboard;
pub mod health;
pub mod likes;
pub mod middleware;
pub mod playlists;
pub mod response;
pub mod subscriptions;
pub mod tweets;
pub mod videos;

use crate::context::AppContext;
use axum::Router;

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(health::routes())
        .merge(videos::routes())
        .merge(tweets::routes())
        .merge(likes::routes())
        .merge(subscriptions::routes())
        .merge(playlists::routes())
        .merge(dashboard::routes())
}
