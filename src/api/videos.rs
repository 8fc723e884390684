/// Video endpoints
use crate::{
    api::{middleware, response::ApiResponse},
    content::{
        models::{parse_id, Page, PageParams, SortDirection},
        videos::{NewVideo, Video, VideoDetail, VideoListItem, VideoListQuery, VideoSortField, VideoUpdate},
    },
    context::AppContext,
    error::{AppError, AppResult},
    media,
};
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

/// Build video routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/v1/videos", get(list_videos).post(publish_video))
        .route(
            "/api/v1/videos/:videoId",
            get(get_video).patch(update_video).delete(delete_video),
        )
        .route(
            "/api/v1/videos/toggle/publish/:videoId",
            patch(toggle_publish),
        )
}

/// Listing query parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListVideosQuery {
    page: Option<u32>,
    limit: Option<u32>,
    query: Option<String>,
    sort_by: Option<String>,
    sort_type: Option<String>,
    user_id: Option<String>,
}

/// Request to publish a video
///
/// File paths point at uploads already written to local disk by the
/// upload layer in front of this service.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct PublishVideoRequest {
    #[validate(length(min = 1, message = "title is required"))]
    title: String,
    #[serde(default)]
    description: String,
    video_file_path: Option<String>,
    thumbnail_path: Option<String>,
}

/// Request to update a video
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateVideoRequest {
    title: Option<String>,
    description: Option<String>,
    thumbnail_path: Option<String>,
}

/// List published videos with filtering, sorting, and pagination
async fn list_videos(
    State(ctx): State<AppContext>,
    Query(query): Query<ListVideosQuery>,
) -> AppResult<ApiResponse<Page<VideoListItem>>> {
    let sort_field = match &query.sort_by {
        Some(field) => VideoSortField::from_str(field)?,
        None => VideoSortField::CreatedAt,
    };
    let sort_direction = match &query.sort_type {
        Some(direction) => SortDirection::from_str(direction)?,
        None => SortDirection::Desc,
    };
    let owner_id = match &query.user_id {
        Some(user_id) => Some(parse_id(user_id, "user")?),
        None => None,
    };

    let params = VideoListQuery {
        page: PageParams::new(query.page, query.limit),
        query: query.query,
        owner_id,
        sort_field,
        sort_direction,
    };

    let page = ctx.videos.list(&params).await?;
    Ok(ApiResponse::ok(page, "Videos fetched successfully"))
}

/// Upload both files through the media host, then persist the video
async fn publish_video(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Json(req): Json<PublishVideoRequest>,
) -> AppResult<ApiResponse<Video>> {
    let actor = middleware::require_actor(&ctx, &headers)?;
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let video_path = media::require_path(req.video_file_path.as_deref(), "video")?;
    let thumbnail_path = media::require_path(req.thumbnail_path.as_deref(), "thumbnail")?;

    let video_file = ctx.media.upload(&video_path).await?;
    let thumbnail = ctx.media.upload(&thumbnail_path).await?;

    let video = ctx
        .videos
        .create(
            &actor,
            NewVideo {
                title: req.title,
                description: req.description,
                video_url: video_file.url,
                thumbnail_url: thumbnail.url,
                duration: video_file.duration.unwrap_or(0.0),
            },
        )
        .await?;

    Ok(ApiResponse::created(video, "Video uploaded successfully"))
}

/// Video detail with channel and like state; counts the view
async fn get_video(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<VideoDetail>> {
    let viewer = middleware::current_actor(&ctx, &headers);
    let detail = ctx.videos.detail(&video_id, viewer.as_deref()).await?;

    Ok(ApiResponse::ok(detail, "Video details fetched successfully"))
}

/// Update title/description/thumbnail, owner-gated
async fn update_video(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Path(video_id): Path<String>,
    Json(req): Json<UpdateVideoRequest>,
) -> AppResult<ApiResponse<Video>> {
    let actor = middleware::require_actor(&ctx, &headers)?;

    let thumbnail_url = match req.thumbnail_path.as_deref() {
        Some(path) if !path.trim().is_empty() => {
            Some(ctx.media.upload(std::path::Path::new(path)).await?.url)
        }
        _ => None,
    };

    let video = ctx
        .videos
        .update(
            &video_id,
            &actor,
            VideoUpdate {
                title: req.title,
                description: req.description,
                thumbnail_url,
            },
        )
        .await?;

    Ok(ApiResponse::ok(video, "Video details updated successfully"))
}

/// Delete a video, owner-gated
async fn delete_video(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let actor = middleware::require_actor(&ctx, &headers)?;
    ctx.videos.delete(&video_id, &actor).await?;

    Ok(ApiResponse::ok((), "Video deleted successfully"))
}

/// Flip the publish flag, owner-gated
async fn toggle_publish(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<bool>> {
    let actor = middleware::require_actor(&ctx, &headers)?;
    let published = ctx.videos.toggle_publish(&video_id, &actor).await?;

    Ok(ApiResponse::ok(published, "Video publish state toggled"))
}
