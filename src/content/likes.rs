/// Like records and toggling
///
/// A like ties an actor to exactly one target: a video, a tweet, or a
/// comment. Presence of the row means "liked"; the toggle flips it.
use crate::{
    content::models::{parse_id, parse_timestamp, ActorSummary},
    error::{AppError, AppResult},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// What a like points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeTarget {
    Video,
    Tweet,
    Comment,
}

impl LikeTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            LikeTarget::Video => "video",
            LikeTarget::Tweet => "tweet",
            LikeTarget::Comment => "comment",
        }
    }

    pub fn from_str(s: &str) -> AppResult<Self> {
        match s {
            "video" => Ok(LikeTarget::Video),
            "tweet" => Ok(LikeTarget::Tweet),
            "comment" => Ok(LikeTarget::Comment),
            _ => Err(AppError::Validation(format!("Invalid like target: {}", s))),
        }
    }
}

/// A like row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: String,
    pub actor_id: String,
    pub target_kind: LikeTarget,
    pub target_id: String,
    pub created_at: DateTime<Utc>,
}

/// Result of a toggle call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggle {
    pub liked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<Like>,
}

/// A liked video joined with its owner, for the liked-videos feed
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedVideo {
    pub id: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub owner: ActorSummary,
}

/// Like manager
#[derive(Clone)]
pub struct LikeManager {
    db: SqlitePool,
}

impl LikeManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Flip the like state for (actor, target)
    ///
    /// Lookup and mutation are two statements; a concurrent double-toggle
    /// by the same actor can interleave between them. The unique index on
    /// (actor, kind, target) keeps a lost race from producing duplicates.
    pub async fn toggle(
        &self,
        actor_id: &str,
        target: LikeTarget,
        target_id: &str,
    ) -> AppResult<LikeToggle> {
        let target_id = parse_id(target_id, target.as_str())?;

        let existing = sqlx::query(
            "SELECT id FROM likes WHERE actor_id = ? AND target_kind = ? AND target_id = ?",
        )
        .bind(actor_id)
        .bind(target.as_str())
        .bind(&target_id)
        .fetch_optional(&self.db)
        .await?;

        if let Some(row) = existing {
            let id: String = row.get("id");
            sqlx::query("DELETE FROM likes WHERE id = ?")
                .bind(&id)
                .execute(&self.db)
                .await?;

            tracing::debug!(actor = %actor_id, target = %target_id, kind = target.as_str(), "like removed");
            return Ok(LikeToggle {
                liked: false,
                record: None,
            });
        }

        let like = Like {
            id: Uuid::new_v4().to_string(),
            actor_id: actor_id.to_string(),
            target_kind: target,
            target_id,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO likes (id, actor_id, target_kind, target_id, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&like.id)
        .bind(&like.actor_id)
        .bind(like.target_kind.as_str())
        .bind(&like.target_id)
        .bind(like.created_at.to_rfc3339())
        .execute(&self.db)
        .await?;

        tracing::debug!(actor = %actor_id, target = %like.target_id, kind = target.as_str(), "like created");
        Ok(LikeToggle {
            liked: true,
            record: Some(like),
        })
    }

    /// Number of likes pointing at a target
    pub async fn count_for(&self, target: LikeTarget, target_id: &str) -> AppResult<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM likes WHERE target_kind = ? AND target_id = ?",
        )
        .bind(target.as_str())
        .bind(target_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.get("n"))
    }

    /// Whether the actor has liked the target; anonymous callers get false
    pub async fn is_liked(
        &self,
        actor_id: Option<&str>,
        target: LikeTarget,
        target_id: &str,
    ) -> AppResult<bool> {
        let Some(actor_id) = actor_id else {
            return Ok(false);
        };

        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM likes WHERE actor_id = ? AND target_kind = ? AND target_id = ?) AS liked",
        )
        .bind(actor_id)
        .bind(target.as_str())
        .bind(target_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.get::<i64, _>("liked") != 0)
    }

    /// Videos the actor has liked, newest like first, joined with owners
    pub async fn liked_videos(&self, actor_id: &str) -> AppResult<Vec<LikedVideo>> {
        let rows = sqlx::query(
            r#"
            SELECT v.id, v.video_url, v.thumbnail_url, v.title, v.description,
                   v.duration, v.views, v.is_published, v.created_at,
                   a.id AS owner_id, a.username, a.full_name, a.avatar_url
            FROM likes l
            JOIN videos v ON v.id = l.target_id
            JOIN accounts a ON a.id = v.owner_id
            WHERE l.actor_id = ? AND l.target_kind = 'video'
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(actor_id)
        .fetch_all(&self.db)
        .await?;

        let mut videos = Vec::with_capacity(rows.len());
        for row in rows {
            let created_at: String = row.get("created_at");
            videos.push(LikedVideo {
                id: row.get("id"),
                video_url: row.get("video_url"),
                thumbnail_url: row.get("thumbnail_url"),
                title: row.get("title"),
                description: row.get("description"),
                duration: row.get("duration"),
                views: row.get("views"),
                is_published: row.get::<i64, _>("is_published") != 0,
                created_at: parse_timestamp(&created_at)?,
                owner: ActorSummary {
                    id: row.get("owner_id"),
                    username: row.get("username"),
                    full_name: row.get("full_name"),
                    avatar_url: row.get("avatar_url"),
                },
            });
        }

        Ok(videos)
    }

    /// Remove all likes targeting an item (cascade step after a delete)
    pub async fn delete_for_target(&self, target: LikeTarget, target_id: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM likes WHERE target_kind = ? AND target_id = ?")
            .bind(target.as_str())
            .bind(target_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::testing::{memory_db, seed_actor, seed_video};

    #[tokio::test]
    async fn test_toggle_round_trip() {
        let db = memory_db().await;
        let actor = seed_actor(&db, "alice").await;
        let owner = seed_actor(&db, "bob").await;
        let video = seed_video(&db, &owner, "clip", true).await;

        let likes = LikeManager::new(db);

        let first = likes.toggle(&actor, LikeTarget::Video, &video).await.unwrap();
        assert!(first.liked);
        let record = first.record.unwrap();
        assert_eq!(record.actor_id, actor);
        assert_eq!(record.target_id, video);
        assert_eq!(likes.count_for(LikeTarget::Video, &video).await.unwrap(), 1);

        let second = likes.toggle(&actor, LikeTarget::Video, &video).await.unwrap();
        assert!(!second.liked);
        assert!(second.record.is_none());
        assert_eq!(likes.count_for(LikeTarget::Video, &video).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_toggle_rejects_malformed_id() {
        let db = memory_db().await;
        let actor = seed_actor(&db, "alice").await;
        let likes = LikeManager::new(db);

        let result = likes.toggle(&actor, LikeTarget::Tweet, "not-an-id").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_is_liked_for_anonymous_and_non_liker() {
        let db = memory_db().await;
        let alice = seed_actor(&db, "alice").await;
        let bob = seed_actor(&db, "bob").await;
        let video = seed_video(&db, &bob, "clip", true).await;

        let likes = LikeManager::new(db);
        likes.toggle(&alice, LikeTarget::Video, &video).await.unwrap();

        assert!(likes
            .is_liked(Some(&alice), LikeTarget::Video, &video)
            .await
            .unwrap());
        assert!(!likes
            .is_liked(Some(&bob), LikeTarget::Video, &video)
            .await
            .unwrap());
        assert!(!likes.is_liked(None, LikeTarget::Video, &video).await.unwrap());
    }

    #[tokio::test]
    async fn test_kinds_do_not_collide() {
        let db = memory_db().await;
        let actor = seed_actor(&db, "alice").await;
        let target = Uuid::new_v4().to_string();

        let likes = LikeManager::new(db);
        likes.toggle(&actor, LikeTarget::Tweet, &target).await.unwrap();

        // Same id under a different kind is an independent relation
        assert!(!likes
            .is_liked(Some(&actor), LikeTarget::Comment, &target)
            .await
            .unwrap());
        assert_eq!(likes.count_for(LikeTarget::Tweet, &target).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_liked_videos_feed_newest_first() {
        let db = memory_db().await;
        let alice = seed_actor(&db, "alice").await;
        let bob = seed_actor(&db, "bob").await;
        let first = seed_video(&db, &bob, "first", true).await;
        let second = seed_video(&db, &bob, "second", true).await;

        let likes = LikeManager::new(db.clone());
        likes.toggle(&alice, LikeTarget::Video, &first).await.unwrap();
        likes.toggle(&alice, LikeTarget::Video, &second).await.unwrap();

        let feed = likes.liked_videos(&alice).await.unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].title, "second");
        assert_eq!(feed[1].title, "first");
        assert_eq!(feed[0].owner.username, "bob");
    }

    #[tokio::test]
    async fn test_delete_for_target_clears_all_likes() {
        let db = memory_db().await;
        let alice = seed_actor(&db, "alice").await;
        let bob = seed_actor(&db, "bob").await;
        let video = seed_video(&db, &bob, "clip", true).await;

        let likes = LikeManager::new(db);
        likes.toggle(&alice, LikeTarget::Video, &video).await.unwrap();
        likes.toggle(&bob, LikeTarget::Video, &video).await.unwrap();

        let removed = likes
            .delete_for_target(LikeTarget::Video, &video)
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(likes.count_for(LikeTarget::Video, &video).await.unwrap(), 0);
    }
}
