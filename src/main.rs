/// Streamside - video sharing and micro-blogging platform backend
///
/// Videos, tweets, likes, playlists, subscriptions, and channel
/// dashboards over a single SQLite store.

mod api;
mod auth;
mod config;
mod content;
mod context;
mod db;
mod error;
mod media;
mod server;

use config::ServerConfig;
use context::AppContext;
use error::AppResult;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "streamside=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    print_banner();

    // Load configuration
    let config = ServerConfig::from_env()?;

    // Create application context
    let ctx = AppContext::new(config).await?;

    // Start server
    server::serve(ctx).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
   _____ __                                 _     __
  / ___// /_________  ____ _____ ___  _____(_)___/ /__
  \__ \/ __/ ___/ _ \/ __ `/ __ `__ \/ ___/ / __  / _ \
 ___/ / /_/ /  /  __/ /_/ / / / / / (__  ) / /_/ /  __/
/____/\__/_/   \___/\__,_/_/ /_/ /_/____/_/\__,_/\___/

        Streamside backend v{}
        "#,
        env!("CARGO_PKG_VERSION")
    );
}
