/// Channel dashboard endpoints
use crate::{
    api::{middleware, response::ApiResponse},
    content::{
        dashboard::ChannelStats,
        models::{Page, PageParams},
        videos::Video,
    },
    context::AppContext,
    error::AppResult,
};
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
    Router,
};
use serde::Deserialize;

/// Build dashboard routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/v1/dashboard/stats", get(channel_stats))
        .route("/api/v1/dashboard/videos", get(channel_videos))
}

#[derive(Debug, Deserialize)]
struct DashboardVideosQuery {
    page: Option<u32>,
    limit: Option<u32>,
}

/// Totals for the authenticated channel
async fn channel_stats(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
) -> AppResult<ApiResponse<ChannelStats>> {
    let actor = middleware::require_actor(&ctx, &headers)?;
    let stats = ctx.dashboard.channel_stats(&actor).await?;

    Ok(ApiResponse::ok(stats, "Channel stats fetched successfully"))
}

/// The authenticated channel's own uploads, drafts included
async fn channel_videos(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Query(query): Query<DashboardVideosQuery>,
) -> AppResult<ApiResponse<Page<Video>>> {
    let actor = middleware::require_actor(&ctx, &headers)?;
    let page = ctx
        .dashboard
        .channel_videos(&actor, PageParams::new(query.page, query.limit))
        .await?;

    Ok(ApiResponse::ok(page, "Channel videos fetched successfully"))
}
