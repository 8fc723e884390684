/// Configuration management for the Streamside backend
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub media: MediaConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
    pub version: String,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_directory: PathBuf,
    pub database: PathBuf,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub token_ttl: i64,
}

/// Media host configuration
///
/// The disk backend copies uploaded files into a public directory served
/// elsewhere; the remote backend forwards them to a hosting service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MediaConfig {
    Disk {
        location: PathBuf,
        public_base_url: String,
    },
    Remote {
        endpoint: String,
        api_key: Option<String>,
    },
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("STREAMSIDE_HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("STREAMSIDE_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| AppError::Validation("Invalid port number".to_string()))?;
        let version = env::var("STREAMSIDE_VERSION")
            .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());

        let data_directory = PathBuf::from(
            env::var("STREAMSIDE_DATA_DIRECTORY").unwrap_or_else(|_| "./data".to_string()),
        );
        let database = env::var("STREAMSIDE_DATABASE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("streamside.sqlite"));

        let jwt_secret = env::var("STREAMSIDE_JWT_SECRET")
            .unwrap_or_else(|_| "dev-secret-change-me".to_string());
        let token_ttl = env::var("STREAMSIDE_TOKEN_TTL")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()
            .map_err(|_| AppError::Validation("Invalid token TTL".to_string()))?;

        let media = match env::var("STREAMSIDE_MEDIA_BACKEND")
            .unwrap_or_else(|_| "disk".to_string())
            .as_str()
        {
            "disk" => MediaConfig::Disk {
                location: env::var("STREAMSIDE_MEDIA_DIRECTORY")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| data_directory.join("media")),
                public_base_url: env::var("STREAMSIDE_MEDIA_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8080/media".to_string()),
            },
            "remote" => MediaConfig::Remote {
                endpoint: env::var("STREAMSIDE_MEDIA_ENDPOINT").map_err(|_| {
                    AppError::Validation(
                        "STREAMSIDE_MEDIA_ENDPOINT is required for the remote media backend"
                            .to_string(),
                    )
                })?,
                api_key: env::var("STREAMSIDE_MEDIA_API_KEY").ok(),
            },
            other => {
                return Err(AppError::Validation(format!(
                    "Unknown media backend: {}",
                    other
                )))
            }
        };

        let level = env::var("STREAMSIDE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            service: ServiceConfig {
                hostname,
                port,
                version,
            },
            storage: StorageConfig {
                data_directory,
                database,
            },
            auth: AuthConfig {
                jwt_secret,
                token_ttl,
            },
            media,
            logging: LoggingConfig { level },
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> AppResult<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(AppError::Validation("JWT secret must not be empty".to_string()));
        }
        if self.auth.token_ttl <= 0 {
            return Err(AppError::Validation("Token TTL must be positive".to_string()));
        }
        if let MediaConfig::Remote { endpoint, .. } = &self.media {
            if endpoint.is_empty() {
                return Err(AppError::Validation(
                    "Media endpoint must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}
