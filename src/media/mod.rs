/// Media hosting adapter
///
/// Handlers receive local file paths (written by the upload layer in front
/// of this service) and hand them to a `MediaHost`, which returns the
/// hosted URL plus attributes derived by the host.
pub mod disk;
pub mod remote;

use crate::{
    config::MediaConfig,
    error::{AppError, AppResult},
};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// A file accepted by the media host
#[derive(Debug, Clone)]
pub struct HostedMedia {
    /// Publicly reachable URL
    pub url: String,
    /// Duration in seconds, when the host can derive it
    pub duration: Option<f64>,
}

/// Media hosting backend
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Upload a local file and return its hosted location
    async fn upload(&self, local_path: &Path) -> AppResult<HostedMedia>;
}

/// Build the media host selected by configuration
pub fn from_config(config: &MediaConfig) -> AppResult<Arc<dyn MediaHost>> {
    match config {
        MediaConfig::Disk {
            location,
            public_base_url,
        } => Ok(Arc::new(disk::DiskMediaHost::new(
            location.clone(),
            public_base_url.clone(),
        ))),
        MediaConfig::Remote { endpoint, api_key } => Ok(Arc::new(remote::RemoteMediaHost::new(
            endpoint.clone(),
            api_key.clone(),
        )?)),
    }
}

/// Reject missing or empty upload paths before touching the filesystem
pub fn require_path(path: Option<&str>, what: &str) -> AppResult<std::path::PathBuf> {
    match path {
        Some(p) if !p.trim().is_empty() => Ok(std::path::PathBuf::from(p)),
        _ => Err(AppError::Validation(format!("{} file is required", what))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_path_accepts_present() {
        let path = require_path(Some("/tmp/upload/clip.mp4"), "video").unwrap();
        assert_eq!(path, std::path::PathBuf::from("/tmp/upload/clip.mp4"));
    }

    #[test]
    fn test_require_path_rejects_missing_and_empty() {
        assert!(require_path(None, "video").is_err());
        assert!(require_path(Some("   "), "thumbnail").is_err());
    }
}
