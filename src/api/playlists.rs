/// Playlist endpoints
use crate::{
    api::{middleware, response::ApiResponse},
    content::playlists::{Playlist, PlaylistDetail, PlaylistSummary},
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

/// Build playlist routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/v1/playlists", post(create_playlist))
        .route("/api/v1/playlists/user/:userId", get(user_playlists))
        .route(
            "/api/v1/playlists/:playlistId",
            get(get_playlist).patch(update_playlist).delete(delete_playlist),
        )
        .route(
            "/api/v1/playlists/add/:videoId/:playlistId",
            patch(add_video),
        )
        .route(
            "/api/v1/playlists/remove/:videoId/:playlistId",
            patch(remove_video),
        )
}

#[derive(Debug, Deserialize, Validate)]
struct CreatePlaylistRequest {
    #[validate(length(min = 1, message = "name is required"))]
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize, Validate)]
struct UpdatePlaylistRequest {
    #[validate(length(min = 1, message = "name is required"))]
    name: String,
    #[validate(length(min = 1, message = "description is required"))]
    description: String,
}

/// Create an empty playlist owned by the actor
async fn create_playlist(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Json(req): Json<CreatePlaylistRequest>,
) -> AppResult<ApiResponse<Playlist>> {
    let actor = middleware::require_actor(&ctx, &headers)?;
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let playlist = ctx
        .playlists
        .create(&actor, &req.name, &req.description)
        .await?;
    Ok(ApiResponse::created(playlist, "Playlist created successfully"))
}

/// Playlists of a user with aggregate counters
async fn user_playlists(
    State(ctx): State<AppContext>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<PlaylistSummary>>> {
    let playlists = ctx.playlists.user_playlists(&user_id).await?;

    Ok(ApiResponse::ok(playlists, "User playlists fetched successfully"))
}

/// Playlist detail with owner and member videos
async fn get_playlist(
    State(ctx): State<AppContext>,
    Path(playlist_id): Path<String>,
) -> AppResult<ApiResponse<PlaylistDetail>> {
    let detail = ctx.playlists.detail(&playlist_id).await?;

    Ok(ApiResponse::ok(detail, "Playlist fetched successfully"))
}

/// Append a video to the playlist, owner-gated
async fn add_video(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<PlaylistDetail>> {
    let actor = middleware::require_actor(&ctx, &headers)?;
    let detail = ctx.playlists.add_video(&playlist_id, &video_id, &actor).await?;

    Ok(ApiResponse::ok(detail, "Video added to the playlist"))
}

/// Remove a video from the playlist, owner-gated
async fn remove_video(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<PlaylistDetail>> {
    let actor = middleware::require_actor(&ctx, &headers)?;
    let detail = ctx
        .playlists
        .remove_video(&playlist_id, &video_id, &actor)
        .await?;

    Ok(ApiResponse::ok(detail, "Video removed from the playlist"))
}

/// Rename/redescribe the playlist, owner-gated
async fn update_playlist(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Path(playlist_id): Path<String>,
    Json(req): Json<UpdatePlaylistRequest>,
) -> AppResult<ApiResponse<Playlist>> {
    let actor = middleware::require_actor(&ctx, &headers)?;
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let playlist = ctx
        .playlists
        .update(&playlist_id, &actor, &req.name, &req.description)
        .await?;
    Ok(ApiResponse::ok(playlist, "Playlist updated successfully"))
}

/// Delete the playlist, owner-gated
async fn delete_playlist(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Path(playlist_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let actor = middleware::require_actor(&ctx, &headers)?;
    ctx.playlists.delete(&playlist_id, &actor).await?;

    Ok(ApiResponse::ok((), "Playlist deleted successfully"))
}
