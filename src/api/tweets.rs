/// Tweet endpoints
use crate::{
    api::{middleware, response::ApiResponse},
    content::tweets::{Tweet, TweetView},
    context::AppContext,
    error::{AppError, AppResult},
};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

/// Build tweet routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/v1/tweets", post(create_tweet))
        .route("/api/v1/tweets/user/:userId", get(user_tweets))
        .route(
            "/api/v1/tweets/:tweetId",
            patch(update_tweet).delete(delete_tweet),
        )
}

#[derive(Debug, Deserialize, Validate)]
struct CreateTweetRequest {
    #[validate(length(min = 1, message = "content is required"))]
    content: String,
}

#[derive(Debug, Deserialize, Validate)]
struct UpdateTweetRequest {
    #[validate(length(min = 1, message = "content is required"))]
    content: String,
}

/// Create a tweet owned by the actor
async fn create_tweet(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Json(req): Json<CreateTweetRequest>,
) -> AppResult<ApiResponse<Tweet>> {
    let actor = middleware::require_actor(&ctx, &headers)?;
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let tweet = ctx.tweets.create(&actor, &req.content).await?;
    Ok(ApiResponse::created(tweet, "Tweet created successfully"))
}

/// Tweets of a user, newest first, with like state for the viewer
async fn user_tweets(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<TweetView>>> {
    let viewer = middleware::current_actor(&ctx, &headers);
    let tweets = ctx.tweets.user_tweets(&user_id, viewer.as_deref()).await?;

    Ok(ApiResponse::ok(tweets, "Tweets fetched successfully"))
}

/// Update tweet content, owner-gated
async fn update_tweet(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Path(tweet_id): Path<String>,
    Json(req): Json<UpdateTweetRequest>,
) -> AppResult<ApiResponse<Tweet>> {
    let actor = middleware::require_actor(&ctx, &headers)?;
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let tweet = ctx.tweets.update(&tweet_id, &actor, &req.content).await?;
    Ok(ApiResponse::ok(tweet, "Tweet updated successfully"))
}

/// Delete a tweet and cascade its likes, owner-gated
async fn delete_tweet(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Path(tweet_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let actor = middleware::require_actor(&ctx, &headers)?;
    ctx.tweets.delete(&tweet_id, &actor).await?;

    Ok(ApiResponse::ok((), "Tweet deleted successfully"))
}
