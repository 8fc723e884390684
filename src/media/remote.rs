/// Remote HTTP media host
use crate::{
    error::{AppError, AppResult},
    media::{HostedMedia, MediaHost},
};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// Response shape of the hosting service
#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
    duration: Option<f64>,
}

/// Forwards uploads to an external hosting service
#[derive(Clone)]
pub struct RemoteMediaHost {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl RemoteMediaHost {
    pub fn new(endpoint: String, api_key: Option<String>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl MediaHost for RemoteMediaHost {
    async fn upload(&self, local_path: &Path) -> AppResult<HostedMedia> {
        let data = fs::read(local_path).await.map_err(|e| {
            AppError::MediaUpload(format!("Failed to read {}: {}", local_path.display(), e))
        })?;

        let file_name = local_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let part = reqwest::multipart::Part::bytes(data).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);

        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::MediaUpload(format!("Upload request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::MediaUpload(format!(
                "Media host returned {}",
                response.status()
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::MediaUpload(format!("Invalid media host response: {}", e)))?;

        Ok(HostedMedia {
            url: body.url,
            duration: body.duration,
        })
    }
}
