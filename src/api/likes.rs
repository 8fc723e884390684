/// Like endpoints
use crate::{
    api::{middleware, response::ApiResponse},
    content::likes::{LikeTarget, LikeToggle, LikedVideo},
    context::AppContext,
    error::AppResult,
};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post},
    Router,
};

/// Build like routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/v1/likes/toggle/v/:videoId", post(toggle_video_like))
        .route("/api/v1/likes/toggle/t/:tweetId", post(toggle_tweet_like))
        .route("/api/v1/likes/toggle/c/:commentId", post(toggle_comment_like))
        .route("/api/v1/likes/videos", get(liked_videos))
}

/// Envelope for a toggle outcome: 201 when the like was created, 200 when
/// it was removed
fn toggle_response(toggle: LikeToggle, what: &str) -> ApiResponse<LikeToggle> {
    if toggle.liked {
        ApiResponse::created(toggle, format!("Liked the {}", what))
    } else {
        ApiResponse::ok(toggle, format!("Unliked the {}", what))
    }
}

/// Toggle the actor's like on a video
async fn toggle_video_like(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<LikeToggle>> {
    let actor = middleware::require_actor(&ctx, &headers)?;
    let toggle = ctx.likes.toggle(&actor, LikeTarget::Video, &video_id).await?;

    Ok(toggle_response(toggle, "video"))
}

/// Toggle the actor's like on a tweet
async fn toggle_tweet_like(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Path(tweet_id): Path<String>,
) -> AppResult<ApiResponse<LikeToggle>> {
    let actor = middleware::require_actor(&ctx, &headers)?;
    let toggle = ctx.likes.toggle(&actor, LikeTarget::Tweet, &tweet_id).await?;

    Ok(toggle_response(toggle, "tweet"))
}

/// Toggle the actor's like on a comment
async fn toggle_comment_like(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Path(comment_id): Path<String>,
) -> AppResult<ApiResponse<LikeToggle>> {
    let actor = middleware::require_actor(&ctx, &headers)?;
    let toggle = ctx
        .likes
        .toggle(&actor, LikeTarget::Comment, &comment_id)
        .await?;

    Ok(toggle_response(toggle, "comment"))
}

/// Videos the actor has liked, newest like first
async fn liked_videos(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
) -> AppResult<ApiResponse<Vec<LikedVideo>>> {
    let actor = middleware::require_actor(&ctx, &headers)?;
    let videos = ctx.likes.liked_videos(&actor).await?;

    Ok(ApiResponse::ok(videos, "Liked videos fetched successfully"))
}
