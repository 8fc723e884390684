/// Subscription endpoints
use crate::{
    api::{middleware, response::ApiResponse},
    content::subscriptions::{ChannelSubscriber, SubscribedChannel, SubscriptionToggle},
    context::AppContext,
    error::AppResult,
};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post},
    Router,
};

/// Build subscription routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route(
            "/api/v1/subscriptions/c/:channelId",
            post(toggle_subscription).get(channel_subscribers),
        )
        .route("/api/v1/subscriptions/u/:subscriberId", get(subscribed_channels))
}

/// Toggle the actor's subscription to a channel
async fn toggle_subscription(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Path(channel_id): Path<String>,
) -> AppResult<ApiResponse<SubscriptionToggle>> {
    let actor = middleware::require_actor(&ctx, &headers)?;
    let toggle = ctx.subscriptions.toggle(&actor, &channel_id).await?;

    let message = if toggle.subscribed {
        "Subscribed to the channel"
    } else {
        "Unsubscribed from the channel"
    };
    Ok(ApiResponse::ok(toggle, message))
}

/// Subscribers of a channel
async fn channel_subscribers(
    State(ctx): State<AppContext>,
    Path(channel_id): Path<String>,
) -> AppResult<ApiResponse<Vec<ChannelSubscriber>>> {
    let subscribers = ctx.subscriptions.channel_subscribers(&channel_id).await?;

    Ok(ApiResponse::ok(subscribers, "Subscribers fetched successfully"))
}

/// Channels an account is subscribed to
async fn subscribed_channels(
    State(ctx): State<AppContext>,
    Path(subscriber_id): Path<String>,
) -> AppResult<ApiResponse<Vec<SubscribedChannel>>> {
    let channels = ctx.subscriptions.subscribed_channels(&subscriber_id).await?;

    Ok(ApiResponse::ok(
        channels,
        "Subscribed channels fetched successfully",
    ))
}
