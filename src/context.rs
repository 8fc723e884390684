/// Application context and dependency injection
use crate::{
    auth::Authenticator,
    config::ServerConfig,
    content::{
        dashboard::DashboardManager, likes::LikeManager, playlists::PlaylistManager,
        subscriptions::SubscriptionManager, tweets::TweetManager, videos::VideoManager,
    },
    db,
    error::AppResult,
    media::{self, MediaHost},
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub db: SqlitePool,
    pub auth: Arc<Authenticator>,
    pub media: Arc<dyn MediaHost>,
    pub videos: Arc<VideoManager>,
    pub tweets: Arc<TweetManager>,
    pub likes: Arc<LikeManager>,
    pub subscriptions: Arc<SubscriptionManager>,
    pub playlists: Arc<PlaylistManager>,
    pub dashboard: Arc<DashboardManager>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> AppResult<Self> {
        config.validate()?;

        // Create data directories if they don't exist
        if !config.storage.data_directory.exists() {
            tokio::fs::create_dir_all(&config.storage.data_directory).await?;
        }

        let pool = db::create_pool(&config.storage.database, db::DatabaseOptions::default()).await?;
        db::run_migrations(&pool).await?;
        db::test_connection(&pool).await?;

        let auth = Arc::new(Authenticator::new(
            config.auth.jwt_secret.clone(),
            config.auth.token_ttl,
        ));
        let media = media::from_config(&config.media)?;

        Ok(Self {
            config: Arc::new(config),
            db: pool.clone(),
            auth,
            media,
            videos: Arc::new(VideoManager::new(pool.clone())),
            tweets: Arc::new(TweetManager::new(pool.clone())),
            likes: Arc::new(LikeManager::new(pool.clone())),
            subscriptions: Arc::new(SubscriptionManager::new(pool.clone())),
            playlists: Arc::new(PlaylistManager::new(pool.clone())),
            dashboard: Arc::new(DashboardManager::new(pool)),
        })
    }

    /// Get service URL
    pub fn service_url(&self) -> String {
        format!(
            "http://{}:{}",
            self.config.service.hostname, self.config.service.port
        )
    }
}
