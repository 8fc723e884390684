/// Channel subscriptions
///
/// A subscription ties a subscriber account to a channel account. The
/// toggle mirrors the like toggle; the list views join back into accounts
/// for the denormalized channel pages.
use crate::{
    content::models::{parse_id, ActorSummary},
    error::{AppError, AppResult},
};
use chrono::Utc;
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Result of a subscription toggle
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionToggle {
    pub subscribed: bool,
}

/// A subscriber of a channel, with the channel's view of them
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSubscriber {
    #[serde(flatten)]
    pub account: ActorSummary,
    /// How many subscribers this subscriber's own channel has
    pub subscribers_count: i64,
    /// Whether the listed channel subscribes back to them
    pub subscribed_to_subscriber: bool,
}

/// A channel an account is subscribed to
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribedChannel {
    #[serde(flatten)]
    pub account: ActorSummary,
    pub cover_image_url: Option<String>,
}

/// Subscription manager
#[derive(Clone)]
pub struct SubscriptionManager {
    db: SqlitePool,
}

impl SubscriptionManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Flip the subscription state for (subscriber, channel)
    ///
    /// Same two-step check-then-act as the like toggle, with the unique
    /// index bounding the concurrent-toggle race. Nothing stops an account
    /// from subscribing to itself.
    pub async fn toggle(&self, subscriber_id: &str, channel_id: &str) -> AppResult<SubscriptionToggle> {
        let channel_id = parse_id(channel_id, "channel")?;

        let channel_exists = sqlx::query("SELECT 1 FROM accounts WHERE id = ?")
            .bind(&channel_id)
            .fetch_optional(&self.db)
            .await?;
        if channel_exists.is_none() {
            return Err(AppError::NotFound(format!("Channel {} not found", channel_id)));
        }

        let existing = sqlx::query(
            "SELECT id FROM subscriptions WHERE subscriber_id = ? AND channel_id = ?",
        )
        .bind(subscriber_id)
        .bind(&channel_id)
        .fetch_optional(&self.db)
        .await?;

        if let Some(row) = existing {
            let id: String = row.get("id");
            sqlx::query("DELETE FROM subscriptions WHERE id = ?")
                .bind(&id)
                .execute(&self.db)
                .await?;

            tracing::debug!(subscriber = %subscriber_id, channel = %channel_id, "subscription removed");
            return Ok(SubscriptionToggle { subscribed: false });
        }

        sqlx::query(
            "INSERT INTO subscriptions (id, subscriber_id, channel_id, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(subscriber_id)
        .bind(&channel_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.db)
        .await?;

        tracing::debug!(subscriber = %subscriber_id, channel = %channel_id, "subscription created");
        Ok(SubscriptionToggle { subscribed: true })
    }

    /// Number of subscriptions whose channel is the given account
    pub async fn subscribers_count(&self, channel_id: &str) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM subscriptions WHERE channel_id = ?")
            .bind(channel_id)
            .fetch_one(&self.db)
            .await?;

        Ok(row.get("n"))
    }

    /// Whether the actor is subscribed to the channel; anonymous gets false
    pub async fn is_subscribed(
        &self,
        actor_id: Option<&str>,
        channel_id: &str,
    ) -> AppResult<bool> {
        let Some(actor_id) = actor_id else {
            return Ok(false);
        };

        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM subscriptions WHERE subscriber_id = ? AND channel_id = ?) AS subscribed",
        )
        .bind(actor_id)
        .bind(channel_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.get::<i64, _>("subscribed") != 0)
    }

    /// Subscribers of a channel, each with their own subscriber count and
    /// whether the channel subscribes back
    pub async fn channel_subscribers(&self, channel_id: &str) -> AppResult<Vec<ChannelSubscriber>> {
        let channel_id = parse_id(channel_id, "channel")?;

        let rows = sqlx::query(
            r#"
            SELECT a.id, a.username, a.full_name, a.avatar_url,
                   (SELECT COUNT(*) FROM subscriptions s2 WHERE s2.channel_id = a.id) AS subscribers_count,
                   EXISTS(
                       SELECT 1 FROM subscriptions s3
                       WHERE s3.channel_id = a.id AND s3.subscriber_id = ?
                   ) AS subscribed_back
            FROM subscriptions s
            JOIN accounts a ON a.id = s.subscriber_id
            WHERE s.channel_id = ?
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(&channel_id)
        .bind(&channel_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ChannelSubscriber {
                account: ActorSummary {
                    id: row.get("id"),
                    username: row.get("username"),
                    full_name: row.get("full_name"),
                    avatar_url: row.get("avatar_url"),
                },
                subscribers_count: row.get("subscribers_count"),
                subscribed_to_subscriber: row.get::<i64, _>("subscribed_back") != 0,
            })
            .collect())
    }

    /// Channels the account is subscribed to
    pub async fn subscribed_channels(&self, subscriber_id: &str) -> AppResult<Vec<SubscribedChannel>> {
        let subscriber_id = parse_id(subscriber_id, "subscriber")?;

        let rows = sqlx::query(
            r#"
            SELECT a.id, a.username, a.full_name, a.avatar_url, a.cover_image_url
            FROM subscriptions s
            JOIN accounts a ON a.id = s.channel_id
            WHERE s.subscriber_id = ?
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(&subscriber_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| SubscribedChannel {
                account: ActorSummary {
                    id: row.get("id"),
                    username: row.get("username"),
                    full_name: row.get("full_name"),
                    avatar_url: row.get("avatar_url"),
                },
                cover_image_url: row.get("cover_image_url"),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::testing::{memory_db, seed_actor};

    #[tokio::test]
    async fn test_toggle_round_trip() {
        let db = memory_db().await;
        let alice = seed_actor(&db, "alice").await;
        let channel = seed_actor(&db, "channel").await;

        let subs = SubscriptionManager::new(db);

        assert!(subs.toggle(&alice, &channel).await.unwrap().subscribed);
        assert_eq!(subs.subscribers_count(&channel).await.unwrap(), 1);
        assert!(subs.is_subscribed(Some(&alice), &channel).await.unwrap());

        assert!(!subs.toggle(&alice, &channel).await.unwrap().subscribed);
        assert_eq!(subs.subscribers_count(&channel).await.unwrap(), 0);
        assert!(!subs.is_subscribed(Some(&alice), &channel).await.unwrap());
    }

    #[tokio::test]
    async fn test_toggle_unknown_channel_is_not_found() {
        let db = memory_db().await;
        let alice = seed_actor(&db, "alice").await;
        let subs = SubscriptionManager::new(db);

        let missing = Uuid::new_v4().to_string();
        assert!(matches!(
            subs.toggle(&alice, &missing).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            subs.toggle(&alice, "garbage").await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_self_subscription_is_allowed() {
        let db = memory_db().await;
        let alice = seed_actor(&db, "alice").await;

        let subs = SubscriptionManager::new(db);
        assert!(subs.toggle(&alice, &alice).await.unwrap().subscribed);
        assert_eq!(subs.subscribers_count(&alice).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_channel_subscribers_view() {
        let db = memory_db().await;
        let channel = seed_actor(&db, "channel").await;
        let alice = seed_actor(&db, "alice").await;
        let bob = seed_actor(&db, "bob").await;

        let subs = SubscriptionManager::new(db);
        subs.toggle(&alice, &channel).await.unwrap();
        subs.toggle(&bob, &channel).await.unwrap();
        // The channel follows alice back, and bob has a subscriber of his own
        subs.toggle(&channel, &alice).await.unwrap();
        subs.toggle(&alice, &bob).await.unwrap();

        let listed = subs.channel_subscribers(&channel).await.unwrap();
        assert_eq!(listed.len(), 2);

        let alice_row = listed.iter().find(|s| s.account.username == "alice").unwrap();
        assert!(alice_row.subscribed_to_subscriber);
        assert_eq!(alice_row.subscribers_count, 1);

        let bob_row = listed.iter().find(|s| s.account.username == "bob").unwrap();
        assert!(!bob_row.subscribed_to_subscriber);
        assert_eq!(bob_row.subscribers_count, 1);
    }

    #[tokio::test]
    async fn test_subscribed_channels_view() {
        let db = memory_db().await;
        let alice = seed_actor(&db, "alice").await;
        let first = seed_actor(&db, "first").await;
        let second = seed_actor(&db, "second").await;

        let subs = SubscriptionManager::new(db);
        subs.toggle(&alice, &first).await.unwrap();
        subs.toggle(&alice, &second).await.unwrap();

        let channels = subs.subscribed_channels(&alice).await.unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].account.username, "second");
        assert_eq!(channels[1].account.username, "first");
    }
}
