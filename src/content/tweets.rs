/// Tweets: short text posts owned by an account
use crate::{
    content::models::{parse_id, parse_timestamp, ActorSummary},
    error::{AppError, AppResult},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// A tweet row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    pub id: String,
    pub owner_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A tweet in the per-user feed, with like state for the viewer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetView {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub owner: ActorSummary,
    pub likes_count: i64,
    pub is_liked: bool,
}

/// Tweet manager
#[derive(Clone)]
pub struct TweetManager {
    db: SqlitePool,
}

impl TweetManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create a tweet owned by the actor
    pub async fn create(&self, owner_id: &str, content: &str) -> AppResult<Tweet> {
        if content.trim().is_empty() {
            return Err(AppError::Validation("Tweet content must not be empty".to_string()));
        }

        let now = Utc::now();
        let tweet = Tweet {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO tweets (id, owner_id, content, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&tweet.id)
        .bind(&tweet.owner_id)
        .bind(&tweet.content)
        .bind(tweet.created_at.to_rfc3339())
        .bind(tweet.updated_at.to_rfc3339())
        .execute(&self.db)
        .await?;

        tracing::info!(tweet = %tweet.id, owner = %owner_id, "tweet created");
        Ok(tweet)
    }

    /// Load a tweet by id
    pub async fn get(&self, tweet_id: &str) -> AppResult<Tweet> {
        let tweet_id = parse_id(tweet_id, "tweet")?;

        let row = sqlx::query(
            "SELECT id, owner_id, content, created_at, updated_at FROM tweets WHERE id = ?",
        )
        .bind(&tweet_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tweet {} not found", tweet_id)))?;

        Self::parse_tweet(row)
    }

    /// Tweets by a user, newest first, with like state for the viewer
    pub async fn user_tweets(
        &self,
        user_id: &str,
        viewer_id: Option<&str>,
    ) -> AppResult<Vec<TweetView>> {
        let user_id = parse_id(user_id, "user")?;

        let rows = sqlx::query(
            r#"
            SELECT t.id, t.content, t.created_at,
                   a.id AS owner_id, a.username, a.full_name, a.avatar_url,
                   (SELECT COUNT(*) FROM likes l
                    WHERE l.target_kind = 'tweet' AND l.target_id = t.id) AS likes_count,
                   EXISTS(SELECT 1 FROM likes l
                          WHERE l.target_kind = 'tweet' AND l.target_id = t.id
                            AND l.actor_id = ?) AS is_liked
            FROM tweets t
            JOIN accounts a ON a.id = t.owner_id
            WHERE t.owner_id = ?
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(viewer_id)
        .bind(&user_id)
        .fetch_all(&self.db)
        .await?;

        let mut tweets = Vec::with_capacity(rows.len());
        for row in rows {
            let created_at: String = row.get("created_at");
            tweets.push(TweetView {
                id: row.get("id"),
                content: row.get("content"),
                created_at: parse_timestamp(&created_at)?,
                owner: ActorSummary {
                    id: row.get("owner_id"),
                    username: row.get("username"),
                    full_name: row.get("full_name"),
                    avatar_url: row.get("avatar_url"),
                },
                likes_count: row.get("likes_count"),
                is_liked: row.get::<i64, _>("is_liked") != 0,
            });
        }

        Ok(tweets)
    }

    /// Update tweet content, owner-gated
    pub async fn update(&self, tweet_id: &str, actor_id: &str, content: &str) -> AppResult<Tweet> {
        if content.trim().is_empty() {
            return Err(AppError::Validation("Tweet content must not be empty".to_string()));
        }

        let mut tweet = self.get(tweet_id).await?;
        if tweet.owner_id != actor_id {
            return Err(AppError::Authorization(
                "Only the owner can update this tweet".to_string(),
            ));
        }

        tweet.content = content.to_string();
        tweet.updated_at = Utc::now();

        sqlx::query("UPDATE tweets SET content = ?, updated_at = ? WHERE id = ?")
            .bind(&tweet.content)
            .bind(tweet.updated_at.to_rfc3339())
            .bind(&tweet.id)
            .execute(&self.db)
            .await?;

        Ok(tweet)
    }

    /// Delete a tweet, owner-gated, then cascade its likes
    ///
    /// The cascade runs after the primary delete has committed; a cascade
    /// failure is surfaced but the tweet stays deleted.
    pub async fn delete(&self, tweet_id: &str, actor_id: &str) -> AppResult<()> {
        let tweet = self.get(tweet_id).await?;
        if tweet.owner_id != actor_id {
            return Err(AppError::Authorization(
                "Only the owner can delete this tweet".to_string(),
            ));
        }

        sqlx::query("DELETE FROM tweets WHERE id = ?")
            .bind(&tweet.id)
            .execute(&self.db)
            .await?;

        let cascade = sqlx::query("DELETE FROM likes WHERE target_kind = 'tweet' AND target_id = ?")
            .bind(&tweet.id)
            .execute(&self.db)
            .await;

        match cascade {
            Ok(result) => {
                tracing::info!(
                    tweet = %tweet.id,
                    likes_removed = result.rows_affected(),
                    "tweet deleted"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(tweet = %tweet.id, error = %e, "like cascade failed after tweet delete");
                Err(AppError::Database(e))
            }
        }
    }

    fn parse_tweet(row: sqlx::sqlite::SqliteRow) -> AppResult<Tweet> {
        let created_at: String = row.get("created_at");
        let updated_at: String = row.get("updated_at");

        Ok(Tweet {
            id: row.get("id"),
            owner_id: row.get("owner_id"),
            content: row.get("content"),
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}
