/// Channel dashboard: totals and the channel's own uploads
use crate::{
    content::{
        models::{Page, PageParams},
        videos::{Video, VideoManager},
    },
    error::AppResult,
};
use serde::Serialize;
use sqlx::{Row, SqlitePool};

/// Aggregate totals for a channel
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    pub total_videos: i64,
    pub total_subscribers: i64,
    pub total_likes: i64,
    pub total_views: i64,
}

/// Dashboard manager
#[derive(Clone)]
pub struct DashboardManager {
    db: SqlitePool,
}

impl DashboardManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Totals for the channel: owned videos, subscribers, likes received
    /// on owned videos, and summed views
    pub async fn channel_stats(&self, channel_id: &str) -> AppResult<ChannelStats> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM videos WHERE owner_id = ?) AS total_videos,
                (SELECT COUNT(*) FROM subscriptions WHERE channel_id = ?) AS total_subscribers,
                (SELECT COUNT(*) FROM likes l
                 JOIN videos v ON v.id = l.target_id
                 WHERE l.target_kind = 'video' AND v.owner_id = ?) AS total_likes,
                (SELECT COALESCE(SUM(views), 0) FROM videos WHERE owner_id = ?) AS total_views
            "#,
        )
        .bind(channel_id)
        .bind(channel_id)
        .bind(channel_id)
        .bind(channel_id)
        .fetch_one(&self.db)
        .await?;

        Ok(ChannelStats {
            total_videos: row.get("total_videos"),
            total_subscribers: row.get("total_subscribers"),
            total_likes: row.get("total_likes"),
            total_views: row.get("total_views"),
        })
    }

    /// The channel's own uploads, drafts included, newest first
    pub async fn channel_videos(&self, channel_id: &str, page: PageParams) -> AppResult<Page<Video>> {
        let total: i64 = sqlx::query("SELECT COUNT(*) AS n FROM videos WHERE owner_id = ?")
            .bind(channel_id)
            .fetch_one(&self.db)
            .await?
            .get("n");

        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, video_url, thumbnail_url, title, description,
                   duration, views, is_published, created_at, updated_at
            FROM videos
            WHERE owner_id = ?
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(channel_id)
        .bind(page.limit as i64)
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        let mut videos = Vec::with_capacity(rows.len());
        for row in rows {
            videos.push(VideoManager::parse_video(row)?);
        }

        Ok(Page::new(videos, page, total))
    }
}
