/// Videos: media items owned by a channel account
///
/// Carries the detail view with its derived like/subscription fields, the
/// paginated listing, owner-gated mutation, and the at-most-once view
/// increment backed by watch history.
use crate::{
    content::models::{parse_id, parse_timestamp, ActorSummary, Page, PageParams, SortDirection},
    error::{AppError, AppResult},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// A video row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub owner_id: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a video
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration: f64,
}

/// Fields accepted when updating a video
#[derive(Debug, Clone, Default)]
pub struct VideoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// The channel block embedded in a video detail view
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoChannel {
    pub id: String,
    pub username: String,
    pub avatar_url: Option<String>,
    pub subscribers_count: i64,
    pub is_subscribed: bool,
}

/// Denormalized video detail view
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetail {
    pub id: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub owner: VideoChannel,
    pub likes_count: i64,
    pub is_liked: bool,
}

/// A video in the paginated listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListItem {
    pub id: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub owner: ActorSummary,
}

/// Whitelisted sort fields for the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSortField {
    CreatedAt,
    Views,
    Duration,
    Title,
}

impl VideoSortField {
    fn column(&self) -> &'static str {
        match self {
            VideoSortField::CreatedAt => "created_at",
            VideoSortField::Views => "views",
            VideoSortField::Duration => "duration",
            VideoSortField::Title => "title",
        }
    }

    pub fn from_str(s: &str) -> AppResult<Self> {
        match s {
            "createdAt" | "created_at" => Ok(VideoSortField::CreatedAt),
            "views" => Ok(VideoSortField::Views),
            "duration" => Ok(VideoSortField::Duration),
            "title" => Ok(VideoSortField::Title),
            _ => Err(AppError::Validation(format!("Invalid sort field: {}", s))),
        }
    }
}

/// Listing parameters
#[derive(Debug, Clone)]
pub struct VideoListQuery {
    pub page: PageParams,
    pub query: Option<String>,
    pub owner_id: Option<String>,
    pub sort_field: VideoSortField,
    pub sort_direction: SortDirection,
}

impl Default for VideoListQuery {
    fn default() -> Self {
        Self {
            page: PageParams::default(),
            query: None,
            owner_id: None,
            sort_field: VideoSortField::CreatedAt,
            sort_direction: SortDirection::Desc,
        }
    }
}

/// Video manager
#[derive(Clone)]
pub struct VideoManager {
    db: SqlitePool,
}

impl VideoManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Persist a new video owned by the actor
    pub async fn create(&self, owner_id: &str, new: NewVideo) -> AppResult<Video> {
        if new.title.trim().is_empty() {
            return Err(AppError::Validation("Video title must not be empty".to_string()));
        }

        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            video_url: new.video_url,
            thumbnail_url: new.thumbnail_url,
            title: new.title,
            description: new.description,
            duration: new.duration,
            views: 0,
            is_published: true,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO videos (id, owner_id, video_url, thumbnail_url, title, description,
                                duration, views, is_published, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, 0, 1, ?, ?)
            "#,
        )
        .bind(&video.id)
        .bind(&video.owner_id)
        .bind(&video.video_url)
        .bind(&video.thumbnail_url)
        .bind(&video.title)
        .bind(&video.description)
        .bind(video.duration)
        .bind(video.created_at.to_rfc3339())
        .bind(video.updated_at.to_rfc3339())
        .execute(&self.db)
        .await?;

        tracing::info!(video = %video.id, owner = %owner_id, "video published");
        Ok(video)
    }

    /// Load a video row by id
    pub async fn get(&self, video_id: &str) -> AppResult<Video> {
        let video_id = parse_id(video_id, "video")?;

        let row = sqlx::query(
            r#"
            SELECT id, owner_id, video_url, thumbnail_url, title, description,
                   duration, views, is_published, created_at, updated_at
            FROM videos WHERE id = ?
            "#,
        )
        .bind(&video_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

        Self::parse_video(row)
    }

    /// Denormalized detail view with channel and like state for the viewer
    ///
    /// A successful fetch by an authenticated viewer counts one view per
    /// (viewer, video) pair, tracked through watch history. The view count
    /// in the returned detail is the value read before the increment.
    pub async fn detail(&self, video_id: &str, viewer_id: Option<&str>) -> AppResult<VideoDetail> {
        let video_id = parse_id(video_id, "video")?;

        let row = sqlx::query(
            r#"
            SELECT v.id, v.video_url, v.thumbnail_url, v.title, v.description,
                   v.duration, v.views, v.is_published, v.created_at,
                   a.id AS owner_id, a.username, a.avatar_url,
                   (SELECT COUNT(*) FROM subscriptions s
                    WHERE s.channel_id = v.owner_id) AS subscribers_count,
                   EXISTS(SELECT 1 FROM subscriptions s
                          WHERE s.channel_id = v.owner_id AND s.subscriber_id = ?) AS is_subscribed,
                   (SELECT COUNT(*) FROM likes l
                    WHERE l.target_kind = 'video' AND l.target_id = v.id) AS likes_count,
                   EXISTS(SELECT 1 FROM likes l
                          WHERE l.target_kind = 'video' AND l.target_id = v.id
                            AND l.actor_id = ?) AS is_liked
            FROM videos v
            JOIN accounts a ON a.id = v.owner_id
            WHERE v.id = ?
            "#,
        )
        .bind(viewer_id)
        .bind(viewer_id)
        .bind(&video_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

        let created_at: String = row.get("created_at");
        let detail = VideoDetail {
            id: row.get("id"),
            video_url: row.get("video_url"),
            thumbnail_url: row.get("thumbnail_url"),
            title: row.get("title"),
            description: row.get("description"),
            duration: row.get("duration"),
            views: row.get("views"),
            is_published: row.get::<i64, _>("is_published") != 0,
            created_at: parse_timestamp(&created_at)?,
            owner: VideoChannel {
                id: row.get("owner_id"),
                username: row.get("username"),
                avatar_url: row.get("avatar_url"),
                subscribers_count: row.get("subscribers_count"),
                is_subscribed: row.get::<i64, _>("is_subscribed") != 0,
            },
            likes_count: row.get("likes_count"),
            is_liked: row.get::<i64, _>("is_liked") != 0,
        };

        if let Some(viewer_id) = viewer_id {
            self.record_view(&video_id, viewer_id).await?;
        }

        Ok(detail)
    }

    /// Count a view once per (viewer, video)
    ///
    /// Check and increment are separate statements; two first-time fetches
    /// racing can both pass the check. Per-statement atomicity still keeps
    /// the counter consistent with however many inserts land.
    async fn record_view(&self, video_id: &str, viewer_id: &str) -> AppResult<()> {
        let watched = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM watch_history WHERE actor_id = ? AND video_id = ?) AS watched",
        )
        .bind(viewer_id)
        .bind(video_id)
        .fetch_one(&self.db)
        .await?;

        if watched.get::<i64, _>("watched") != 0 {
            return Ok(());
        }

        sqlx::query("UPDATE videos SET views = views + 1 WHERE id = ?")
            .bind(video_id)
            .execute(&self.db)
            .await?;

        sqlx::query(
            "INSERT OR IGNORE INTO watch_history (actor_id, video_id, watched_at) VALUES (?, ?, ?)",
        )
        .bind(viewer_id)
        .bind(video_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Published videos, filtered, sorted, paginated
    pub async fn list(&self, params: &VideoListQuery) -> AppResult<Page<VideoListItem>> {
        let like_pattern = params.query.as_ref().map(|q| format!("%{}%", q));

        let mut filter = String::from(" WHERE v.is_published = 1");
        if params.owner_id.is_some() {
            filter.push_str(" AND v.owner_id = ?");
        }
        if like_pattern.is_some() {
            filter.push_str(" AND (v.title LIKE ? OR v.description LIKE ?)");
        }

        let count_sql = format!("SELECT COUNT(*) AS n FROM videos v{}", filter);
        let mut count_query = sqlx::query(&count_sql);
        if let Some(owner_id) = &params.owner_id {
            count_query = count_query.bind(owner_id);
        }
        if let Some(pattern) = &like_pattern {
            count_query = count_query.bind(pattern).bind(pattern);
        }
        let total: i64 = count_query.fetch_one(&self.db).await?.get("n");

        let list_sql = format!(
            r#"
            SELECT v.id, v.video_url, v.thumbnail_url, v.title, v.description,
                   v.duration, v.views, v.created_at,
                   a.id AS owner_id, a.username, a.full_name, a.avatar_url
            FROM videos v
            JOIN accounts a ON a.id = v.owner_id{}
            ORDER BY v.{} {}
            LIMIT ? OFFSET ?
            "#,
            filter,
            params.sort_field.column(),
            params.sort_direction.as_sql()
        );

        let mut list_query = sqlx::query(&list_sql);
        if let Some(owner_id) = &params.owner_id {
            list_query = list_query.bind(owner_id);
        }
        if let Some(pattern) = &like_pattern {
            list_query = list_query.bind(pattern).bind(pattern);
        }
        let rows = list_query
            .bind(params.page.limit as i64)
            .bind(params.page.offset())
            .fetch_all(&self.db)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let created_at: String = row.get("created_at");
            items.push(VideoListItem {
                id: row.get("id"),
                video_url: row.get("video_url"),
                thumbnail_url: row.get("thumbnail_url"),
                title: row.get("title"),
                description: row.get("description"),
                duration: row.get("duration"),
                views: row.get("views"),
                created_at: parse_timestamp(&created_at)?,
                owner: ActorSummary {
                    id: row.get("owner_id"),
                    username: row.get("username"),
                    full_name: row.get("full_name"),
                    avatar_url: row.get("avatar_url"),
                },
            });
        }

        Ok(Page::new(items, params.page, total))
    }

    /// Update title/description/thumbnail, owner-gated
    pub async fn update(
        &self,
        video_id: &str,
        actor_id: &str,
        update: VideoUpdate,
    ) -> AppResult<Video> {
        let mut video = self.get(video_id).await?;
        if video.owner_id != actor_id {
            return Err(AppError::Authorization(
                "Only the owner can update this video".to_string(),
            ));
        }

        if let Some(title) = update.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("Video title must not be empty".to_string()));
            }
            video.title = title;
        }
        if let Some(description) = update.description {
            video.description = description;
        }
        if let Some(thumbnail_url) = update.thumbnail_url {
            video.thumbnail_url = thumbnail_url;
        }
        video.updated_at = Utc::now();

        sqlx::query(
            "UPDATE videos SET title = ?, description = ?, thumbnail_url = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(video.updated_at.to_rfc3339())
        .bind(&video.id)
        .execute(&self.db)
        .await?;

        Ok(video)
    }

    /// Delete a video, owner-gated, then cascade dependent rows
    pub async fn delete(&self, video_id: &str, actor_id: &str) -> AppResult<()> {
        let video = self.get(video_id).await?;
        if video.owner_id != actor_id {
            return Err(AppError::Authorization(
                "Only the owner can delete this video".to_string(),
            ));
        }

        sqlx::query("DELETE FROM videos WHERE id = ?")
            .bind(&video.id)
            .execute(&self.db)
            .await?;

        // Cascade after the committed primary delete: likes, then history
        let likes = sqlx::query("DELETE FROM likes WHERE target_kind = 'video' AND target_id = ?")
            .bind(&video.id)
            .execute(&self.db)
            .await;
        if let Err(e) = likes {
            tracing::warn!(video = %video.id, error = %e, "like cascade failed after video delete");
            return Err(AppError::Database(e));
        }

        sqlx::query("DELETE FROM watch_history WHERE video_id = ?")
            .bind(&video.id)
            .execute(&self.db)
            .await?;

        tracing::info!(video = %video.id, "video deleted");
        Ok(())
    }

    /// Flip the publish flag, owner-gated; returns the new state
    pub async fn toggle_publish(&self, video_id: &str, actor_id: &str) -> AppResult<bool> {
        let video = self.get(video_id).await?;
        if video.owner_id != actor_id {
            return Err(AppError::Authorization(
                "Only the owner can toggle the publish state of this video".to_string(),
            ));
        }

        let next = !video.is_published;
        sqlx::query("UPDATE videos SET is_published = ?, updated_at = ? WHERE id = ?")
            .bind(next as i64)
            .bind(Utc::now().to_rfc3339())
            .bind(&video.id)
            .execute(&self.db)
            .await?;

        Ok(next)
    }

    pub(crate) fn parse_video(row: sqlx::sqlite::SqliteRow) -> AppResult<Video> {
        let created_at: String = row.get("created_at");
        let updated_at: String = row.get("updated_at");

        Ok(Video {
            id: row.get("id"),
            owner_id: row.get("owner_id"),
            video_url: row.get("video_url"),
            thumbnail_url: row.get("thumbnail_url"),
            title: row.get("title"),
            description: row.get("description"),
            duration: row.get("duration"),
            views: row.get("views"),
            is_published: row.get::<i64, _>("is_published") != 0,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::likes::{LikeManager, LikeTarget};
    use crate::content::subscriptions::SubscriptionManager;
    use crate::content::testing::{memory_db, seed_actor, seed_video};

    fn new_video(title: &str) -> NewVideo {
        NewVideo {
            title: title.to_string(),
            description: format!("{} description", title),
            video_url: "https://media.example/v/clip.mp4".to_string(),
            thumbnail_url: "https://media.example/t/clip.jpg".to_string(),
            duration: 12.5,
        }
    }

    #[tokio::test]
    async fn test_create_requires_title() {
        let db = memory_db().await;
        let alice = seed_actor(&db, "alice").await;

        let videos = VideoManager::new(db);
        assert!(matches!(
            videos.create(&alice, new_video("  ")).await,
            Err(AppError::Validation(_))
        ));

        let video = videos.create(&alice, new_video("clip")).await.unwrap();
        assert!(video.is_published);
        assert_eq!(video.views, 0);
    }

    #[tokio::test]
    async fn test_detail_derived_fields() {
        let db = memory_db().await;
        let owner = seed_actor(&db, "owner").await;
        let alice = seed_actor(&db, "alice").await;
        let video = seed_video(&db, &owner, "clip", true).await;

        let videos = VideoManager::new(db.clone());
        let likes = LikeManager::new(db.clone());
        let subs = SubscriptionManager::new(db);

        likes.toggle(&alice, LikeTarget::Video, &video).await.unwrap();
        subs.toggle(&alice, &owner).await.unwrap();

        let detail = videos.detail(&video, Some(&alice)).await.unwrap();
        assert_eq!(detail.likes_count, 1);
        assert!(detail.is_liked);
        assert_eq!(detail.owner.subscribers_count, 1);
        assert!(detail.owner.is_subscribed);
        assert_eq!(detail.owner.username, "owner");

        // Anonymous viewers get the counts but no personal flags
        let detail = videos.detail(&video, None).await.unwrap();
        assert_eq!(detail.likes_count, 1);
        assert!(!detail.is_liked);
        assert!(!detail.owner.is_subscribed);
    }

    #[tokio::test]
    async fn test_views_increment_once_per_viewer() {
        let db = memory_db().await;
        let owner = seed_actor(&db, "owner").await;
        let alice = seed_actor(&db, "alice").await;
        let bob = seed_actor(&db, "bob").await;
        let video = seed_video(&db, &owner, "clip", true).await;

        let videos = VideoManager::new(db);

        videos.detail(&video, Some(&alice)).await.unwrap();
        videos.detail(&video, Some(&alice)).await.unwrap();
        assert_eq!(videos.get(&video).await.unwrap().views, 1);

        videos.detail(&video, Some(&bob)).await.unwrap();
        assert_eq!(videos.get(&video).await.unwrap().views, 2);

        // Anonymous fetches never count
        videos.detail(&video, None).await.unwrap();
        assert_eq!(videos.get(&video).await.unwrap().views, 2);
    }

    #[tokio::test]
    async fn test_list_pagination_disjoint_and_ordered() {
        let db = memory_db().await;
        let owner = seed_actor(&db, "owner").await;
        for i in 0..5 {
            seed_video(&db, &owner, &format!("clip-{}", i), true).await;
        }

        let videos = VideoManager::new(db);

        let mut params = VideoListQuery {
            page: PageParams::new(Some(1), Some(2)),
            sort_field: VideoSortField::Title,
            sort_direction: SortDirection::Asc,
            ..Default::default()
        };
        let first = videos.list(&params).await.unwrap();
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.total_items, 5);
        assert_eq!(first.total_pages, 3);

        params.page = PageParams::new(Some(2), Some(2));
        let second = videos.list(&params).await.unwrap();
        assert_eq!(second.items.len(), 2);

        let first_ids: Vec<_> = first.items.iter().map(|v| v.id.clone()).collect();
        assert!(second.items.iter().all(|v| !first_ids.contains(&v.id)));
        assert!(first.items[0].title < first.items[1].title);
        assert!(first.items[1].title < second.items[0].title);

        // A page past the end is empty, not an error
        params.page = PageParams::new(Some(5), Some(2));
        let past = videos.list(&params).await.unwrap();
        assert!(past.items.is_empty());
        assert_eq!(past.total_items, 5);
    }

    #[tokio::test]
    async fn test_list_filters_query_owner_and_published() {
        let db = memory_db().await;
        let alice = seed_actor(&db, "alice").await;
        let bob = seed_actor(&db, "bob").await;
        seed_video(&db, &alice, "cooking pasta", true).await;
        seed_video(&db, &alice, "cooking rice", false).await;
        seed_video(&db, &bob, "woodworking", true).await;

        let videos = VideoManager::new(db);

        let params = VideoListQuery {
            query: Some("cooking".to_string()),
            ..Default::default()
        };
        let found = videos.list(&params).await.unwrap();
        // The unpublished draft stays hidden
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].title, "cooking pasta");

        let params = VideoListQuery {
            owner_id: Some(bob.clone()),
            ..Default::default()
        };
        let found = videos.list(&params).await.unwrap();
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].owner.username, "bob");
    }

    #[tokio::test]
    async fn test_update_and_delete_are_owner_gated() {
        let db = memory_db().await;
        let alice = seed_actor(&db, "alice").await;
        let bob = seed_actor(&db, "bob").await;
        let video = seed_video(&db, &alice, "clip", true).await;

        let videos = VideoManager::new(db);

        let update = VideoUpdate {
            title: Some("stolen".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            videos.update(&video, &bob, update).await,
            Err(AppError::Authorization(_))
        ));
        assert_eq!(videos.get(&video).await.unwrap().title, "clip");

        assert!(matches!(
            videos.delete(&video, &bob).await,
            Err(AppError::Authorization(_))
        ));
        assert!(videos.get(&video).await.is_ok());

        let update = VideoUpdate {
            title: Some("renamed".to_string()),
            description: Some("new text".to_string()),
            ..Default::default()
        };
        let updated = videos.update(&video, &alice, update).await.unwrap();
        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.description, "new text");
    }

    #[tokio::test]
    async fn test_delete_cascades_likes_and_history() {
        let db = memory_db().await;
        let alice = seed_actor(&db, "alice").await;
        let bob = seed_actor(&db, "bob").await;
        let video = seed_video(&db, &alice, "clip", true).await;

        let videos = VideoManager::new(db.clone());
        let likes = LikeManager::new(db.clone());

        likes.toggle(&bob, LikeTarget::Video, &video).await.unwrap();
        videos.detail(&video, Some(&bob)).await.unwrap();

        videos.delete(&video, &alice).await.unwrap();

        assert_eq!(likes.count_for(LikeTarget::Video, &video).await.unwrap(), 0);
        let history: i64 = sqlx::query("SELECT COUNT(*) AS n FROM watch_history WHERE video_id = ?")
            .bind(&video)
            .fetch_one(&db)
            .await
            .unwrap()
            .get("n");
        assert_eq!(history, 0);
    }

    #[tokio::test]
    async fn test_toggle_publish() {
        let db = memory_db().await;
        let alice = seed_actor(&db, "alice").await;
        let bob = seed_actor(&db, "bob").await;
        let video = seed_video(&db, &alice, "clip", true).await;

        let videos = VideoManager::new(db);

        assert!(matches!(
            videos.toggle_publish(&video, &bob).await,
            Err(AppError::Authorization(_))
        ));

        assert!(!videos.toggle_publish(&video, &alice).await.unwrap());
        assert!(!videos.get(&video).await.unwrap().is_published);
        assert!(videos.toggle_publish(&video, &alice).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_rejects_malformed_and_missing_ids() {
        let db = memory_db().await;
        let videos = VideoManager::new(db);

        assert!(matches!(
            videos.get("garbage").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            videos.get(&Uuid::new_v4().to_string()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
