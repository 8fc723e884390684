/// Playlists: ordered video collections owned by an account
use crate::{
    content::models::{parse_id, parse_timestamp},
    error::{AppError, AppResult},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// A playlist row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-user playlist summary with aggregate counters
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub total_videos: i64,
    pub total_views: i64,
    pub updated_at: DateTime<Utc>,
}

/// Owner block in a playlist detail
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistOwner {
    pub id: String,
    pub username: String,
    pub full_name: String,
}

/// A member video in a playlist detail, in playlist order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistVideo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub views: i64,
    pub created_at: DateTime<Utc>,
}

/// Denormalized playlist detail
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistDetail {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner: PlaylistOwner,
    pub total_videos: i64,
    pub videos: Vec<PlaylistVideo>,
}

/// Playlist manager
#[derive(Clone)]
pub struct PlaylistManager {
    db: SqlitePool,
}

impl PlaylistManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create an empty playlist owned by the actor
    pub async fn create(&self, owner_id: &str, name: &str, description: &str) -> AppResult<Playlist> {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Playlist name must not be empty".to_string()));
        }

        let now = Utc::now();
        let playlist = Playlist {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO playlists (id, owner_id, name, description, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&playlist.id)
        .bind(&playlist.owner_id)
        .bind(&playlist.name)
        .bind(&playlist.description)
        .bind(playlist.created_at.to_rfc3339())
        .bind(playlist.updated_at.to_rfc3339())
        .execute(&self.db)
        .await?;

        tracing::info!(playlist = %playlist.id, owner = %owner_id, "playlist created");
        Ok(playlist)
    }

    /// Load a playlist row by id
    pub async fn get(&self, playlist_id: &str) -> AppResult<Playlist> {
        let playlist_id = parse_id(playlist_id, "playlist")?;

        let row = sqlx::query(
            "SELECT id, owner_id, name, description, created_at, updated_at FROM playlists WHERE id = ?",
        )
        .bind(&playlist_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Playlist {} not found", playlist_id)))?;

        let created_at: String = row.get("created_at");
        let updated_at: String = row.get("updated_at");
        Ok(Playlist {
            id: row.get("id"),
            owner_id: row.get("owner_id"),
            name: row.get("name"),
            description: row.get("description"),
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }

    /// Playlists of a user with aggregate video/view counters
    pub async fn user_playlists(&self, user_id: &str) -> AppResult<Vec<PlaylistSummary>> {
        let user_id = parse_id(user_id, "user")?;

        let rows = sqlx::query(
            r#"
            SELECT p.id, p.name, p.description, p.updated_at,
                   (SELECT COUNT(*) FROM playlist_videos pv WHERE pv.playlist_id = p.id) AS total_videos,
                   (SELECT COALESCE(SUM(v.views), 0)
                    FROM playlist_videos pv JOIN videos v ON v.id = pv.video_id
                    WHERE pv.playlist_id = p.id) AS total_views
            FROM playlists p
            WHERE p.owner_id = ?
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(&user_id)
        .fetch_all(&self.db)
        .await?;

        let mut playlists = Vec::with_capacity(rows.len());
        for row in rows {
            let updated_at: String = row.get("updated_at");
            playlists.push(PlaylistSummary {
                id: row.get("id"),
                name: row.get("name"),
                description: row.get("description"),
                total_videos: row.get("total_videos"),
                total_views: row.get("total_views"),
                updated_at: parse_timestamp(&updated_at)?,
            });
        }

        Ok(playlists)
    }

    /// Playlist with owner and member videos in playlist order
    pub async fn detail(&self, playlist_id: &str) -> AppResult<PlaylistDetail> {
        let playlist = self.get(playlist_id).await?;

        let owner_row = sqlx::query("SELECT id, username, full_name FROM accounts WHERE id = ?")
            .bind(&playlist.owner_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Owner of playlist {} not found", playlist.id))
            })?;

        let video_rows = sqlx::query(
            r#"
            SELECT v.id, v.title, v.description, v.views, v.created_at
            FROM playlist_videos pv
            JOIN videos v ON v.id = pv.video_id
            WHERE pv.playlist_id = ?
            ORDER BY pv.position ASC
            "#,
        )
        .bind(&playlist.id)
        .fetch_all(&self.db)
        .await?;

        let mut videos = Vec::with_capacity(video_rows.len());
        for row in video_rows {
            let created_at: String = row.get("created_at");
            videos.push(PlaylistVideo {
                id: row.get("id"),
                title: row.get("title"),
                description: row.get("description"),
                views: row.get("views"),
                created_at: parse_timestamp(&created_at)?,
            });
        }

        Ok(PlaylistDetail {
            id: playlist.id,
            name: playlist.name,
            description: playlist.description,
            created_at: playlist.created_at,
            updated_at: playlist.updated_at,
            owner: PlaylistOwner {
                id: owner_row.get("id"),
                username: owner_row.get("username"),
                full_name: owner_row.get("full_name"),
            },
            total_videos: videos.len() as i64,
            videos,
        })
    }

    /// Append a video to the playlist, owner-gated
    pub async fn add_video(
        &self,
        playlist_id: &str,
        video_id: &str,
        actor_id: &str,
    ) -> AppResult<PlaylistDetail> {
        let video_id = parse_id(video_id, "video")?;
        let playlist = self.get(playlist_id).await?;

        let video_exists = sqlx::query("SELECT 1 FROM videos WHERE id = ?")
            .bind(&video_id)
            .fetch_optional(&self.db)
            .await?;
        if video_exists.is_none() {
            return Err(AppError::NotFound(format!("Video {} not found", video_id)));
        }

        if playlist.owner_id != actor_id {
            return Err(AppError::Authorization(
                "Only the owner can add videos to this playlist".to_string(),
            ));
        }

        let already = sqlx::query(
            "SELECT 1 FROM playlist_videos WHERE playlist_id = ? AND video_id = ?",
        )
        .bind(&playlist.id)
        .bind(&video_id)
        .fetch_optional(&self.db)
        .await?;
        if already.is_some() {
            return Err(AppError::Conflict(format!(
                "Video {} is already in the playlist",
                video_id
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO playlist_videos (playlist_id, video_id, position, added_at)
            VALUES (?, ?, (SELECT COALESCE(MAX(position), -1) + 1 FROM playlist_videos WHERE playlist_id = ?), ?)
            "#,
        )
        .bind(&playlist.id)
        .bind(&video_id)
        .bind(&playlist.id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.db)
        .await?;

        self.detail(&playlist.id).await
    }

    /// Remove a video from the playlist, owner-gated
    pub async fn remove_video(
        &self,
        playlist_id: &str,
        video_id: &str,
        actor_id: &str,
    ) -> AppResult<PlaylistDetail> {
        let video_id = parse_id(video_id, "video")?;
        let playlist = self.get(playlist_id).await?;

        if playlist.owner_id != actor_id {
            return Err(AppError::Authorization(
                "Only the owner can remove videos from this playlist".to_string(),
            ));
        }

        let result = sqlx::query(
            "DELETE FROM playlist_videos WHERE playlist_id = ? AND video_id = ?",
        )
        .bind(&playlist.id)
        .bind(&video_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Video {} is not in the playlist",
                video_id
            )));
        }

        self.detail(&playlist.id).await
    }

    /// Rename/redescribe the playlist, owner-gated; both fields required
    pub async fn update(
        &self,
        playlist_id: &str,
        actor_id: &str,
        name: &str,
        description: &str,
    ) -> AppResult<Playlist> {
        let mut playlist = self.get(playlist_id).await?;

        if playlist.owner_id != actor_id {
            return Err(AppError::Authorization(
                "Only the owner can update this playlist".to_string(),
            ));
        }

        if name.trim().is_empty() || description.trim().is_empty() {
            return Err(AppError::Validation(
                "Playlist name and description are required".to_string(),
            ));
        }

        playlist.name = name.to_string();
        playlist.description = description.to_string();
        playlist.updated_at = Utc::now();

        sqlx::query("UPDATE playlists SET name = ?, description = ?, updated_at = ? WHERE id = ?")
            .bind(&playlist.name)
            .bind(&playlist.description)
            .bind(playlist.updated_at.to_rfc3339())
            .bind(&playlist.id)
            .execute(&self.db)
            .await?;

        Ok(playlist)
    }

    /// Delete the playlist and its membership rows, owner-gated
    pub async fn delete(&self, playlist_id: &str, actor_id: &str) -> AppResult<()> {
        let playlist = self.get(playlist_id).await?;

        if playlist.owner_id != actor_id {
            return Err(AppError::Authorization(
                "Only the owner can delete this playlist".to_string(),
            ));
        }

        sqlx::query("DELETE FROM playlists WHERE id = ?")
            .bind(&playlist.id)
            .execute(&self.db)
            .await?;

        sqlx::query("DELETE FROM playlist_videos WHERE playlist_id = ?")
            .bind(&playlist.id)
            .execute(&self.db)
            .await?;

        tracing::info!(playlist = %playlist.id, "playlist deleted");
        Ok(())
    }
}
