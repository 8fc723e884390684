/// In-memory database fixtures for manager tests
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Fresh in-memory database with the full schema
pub async fn memory_db() -> SqlitePool {
    let db = SqlitePool::connect(":memory:").await.unwrap();

    sqlx::query(
        r#"
        CREATE TABLE accounts (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            full_name TEXT NOT NULL,
            avatar_url TEXT,
            cover_image_url TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&db)
    .await
    .unwrap();

    sqlx::query(
        r#"
        CREATE TABLE videos (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            video_url TEXT NOT NULL,
            thumbnail_url TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            duration REAL NOT NULL DEFAULT 0,
            views INTEGER NOT NULL DEFAULT 0,
            is_published INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&db)
    .await
    .unwrap();

    sqlx::query(
        r#"
        CREATE TABLE tweets (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&db)
    .await
    .unwrap();

    sqlx::query(
        r#"
        CREATE TABLE likes (
            id TEXT PRIMARY KEY,
            actor_id TEXT NOT NULL,
            target_kind TEXT NOT NULL,
            target_id TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&db)
    .await
    .unwrap();

    sqlx::query("CREATE UNIQUE INDEX idx_likes_unique ON likes(actor_id, target_kind, target_id)")
        .execute(&db)
        .await
        .unwrap();

    sqlx::query(
        r#"
        CREATE TABLE subscriptions (
            id TEXT PRIMARY KEY,
            subscriber_id TEXT NOT NULL,
            channel_id TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&db)
    .await
    .unwrap();

    sqlx::query(
        "CREATE UNIQUE INDEX idx_subscriptions_unique ON subscriptions(subscriber_id, channel_id)",
    )
    .execute(&db)
    .await
    .unwrap();

    sqlx::query(
        r#"
        CREATE TABLE playlists (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&db)
    .await
    .unwrap();

    sqlx::query(
        r#"
        CREATE TABLE playlist_videos (
            playlist_id TEXT NOT NULL,
            video_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            added_at TEXT NOT NULL,
            PRIMARY KEY (playlist_id, video_id)
        )
        "#,
    )
    .execute(&db)
    .await
    .unwrap();

    sqlx::query(
        r#"
        CREATE TABLE watch_history (
            actor_id TEXT NOT NULL,
            video_id TEXT NOT NULL,
            watched_at TEXT NOT NULL,
            PRIMARY KEY (actor_id, video_id)
        )
        "#,
    )
    .execute(&db)
    .await
    .unwrap();

    db
}

/// Insert an account and return its id
pub async fn seed_actor(db: &SqlitePool, username: &str) -> String {
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO accounts (id, username, full_name, avatar_url, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(username)
    .bind(format!("{} Example", username))
    .bind(format!("https://media.example/avatars/{}.png", username))
    .bind(Utc::now().to_rfc3339())
    .execute(db)
    .await
    .unwrap();

    id
}

/// Insert a video and return its id
pub async fn seed_video(db: &SqlitePool, owner_id: &str, title: &str, published: bool) -> String {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();
    sqlx::query(
        r#"
        INSERT INTO videos (id, owner_id, video_url, thumbnail_url, title, description,
                            duration, views, is_published, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(owner_id)
    .bind(format!("https://media.example/v/{}.mp4", id))
    .bind(format!("https://media.example/t/{}.jpg", id))
    .bind(title)
    .bind(format!("{} description", title))
    .bind(42.0_f64)
    .bind(published as i64)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await
    .unwrap();

    id
}

/// Insert a tweet and return its id
pub async fn seed_tweet(db: &SqlitePool, owner_id: &str, content: &str) -> String {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();
    sqlx::query(
        "INSERT INTO tweets (id, owner_id, content, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(owner_id)
    .bind(content)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await
    .unwrap();

    id
}
