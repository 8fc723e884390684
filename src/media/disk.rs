/// Disk-based media host
use crate::{
    error::{AppError, AppResult},
    media::{HostedMedia, MediaHost},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Copies uploads into a directory served as static files
///
/// Duration extraction needs a probe the disk backend does not carry, so
/// `duration` is reported as unknown.
#[derive(Clone)]
pub struct DiskMediaHost {
    base_path: PathBuf,
    public_base_url: String,
}

impl DiskMediaHost {
    pub fn new(base_path: PathBuf, public_base_url: String) -> Self {
        Self {
            base_path,
            public_base_url,
        }
    }

    /// Hosted filename: fresh id + original extension
    fn hosted_name(&self, local_path: &Path) -> String {
        match local_path.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        }
    }
}

#[async_trait]
impl MediaHost for DiskMediaHost {
    async fn upload(&self, local_path: &Path) -> AppResult<HostedMedia> {
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            AppError::MediaUpload(format!("Failed to create media directory: {}", e))
        })?;

        let name = self.hosted_name(local_path);
        let target = self.base_path.join(&name);

        fs::copy(local_path, &target).await.map_err(|e| {
            AppError::MediaUpload(format!(
                "Failed to store {}: {}",
                local_path.display(),
                e
            ))
        })?;

        Ok(HostedMedia {
            url: format!("{}/{}", self.public_base_url.trim_end_matches('/'), name),
            duration: None,
        })
    }
}
