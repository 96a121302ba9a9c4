//! Media host client.
//!
//! Uploads go straight to the host with an unsigned preset. Deletions need
//! privileged credentials, so they are forwarded to a trusted backend.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use tokio::sync::mpsc;

use super::upload::UploadProgress;
use crate::config::MediaHostConfig;
use crate::errors::AppError;
use crate::models::{MediaDeletion, MediaKind, UploadedMedia};

/// Size of the body chunks progress is reported on.
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// A file to send to the media host.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub kind: MediaKind,
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Operations the backend needs from the media host.
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Upload a file, reporting progress on `progress` as the body is sent.
    async fn upload(
        &self,
        request: UploadRequest,
        progress: mpsc::UnboundedSender<UploadProgress>,
    ) -> Result<UploadedMedia, AppError>;

    /// Delete a hosted file by identifier and resource kind.
    async fn delete(&self, target: &MediaDeletion) -> Result<(), AppError>;
}

/// HTTP implementation of [`MediaHost`].
pub struct HttpMediaHost {
    client: Client,
    config: MediaHostConfig,
}

impl HttpMediaHost {
    pub fn new(config: MediaHostConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn upload_url(&self, kind: MediaKind) -> String {
        format!(
            "{}/{}/{}/upload",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name,
            kind.as_str()
        )
    }
}

#[async_trait]
impl MediaHost for HttpMediaHost {
    async fn upload(
        &self,
        request: UploadRequest,
        progress: mpsc::UnboundedSender<UploadProgress>,
    ) -> Result<UploadedMedia, AppError> {
        let total = request.data.len() as u64;
        let _ = progress.send(UploadProgress::Started { total });

        // Chunk the body so progress advances as the transport pulls data.
        let chunks: Vec<Bytes> = request
            .data
            .chunks(UPLOAD_CHUNK_SIZE)
            .map(|c| request.data.slice_ref(c))
            .collect();
        let mut sent = 0u64;
        let sender = progress.clone();
        let body_stream = stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len() as u64;
            let _ = sender.send(UploadProgress::Sent { sent, total });
            Ok::<Bytes, std::io::Error>(chunk)
        }));

        let file_part = Part::stream_with_length(Body::wrap_stream(body_stream), total)
            .file_name(request.file_name.clone())
            .mime_str(&request.content_type)
            .map_err(|e| AppError::Validation(format!("Invalid content type: {}", e)))?;

        let form = Form::new()
            .part("file", file_part)
            .text("upload_preset", self.config.upload_preset.clone())
            .text("folder", self.config.folder.clone());

        let response = self
            .client
            .post(self.upload_url(request.kind))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Transport(format!(
                "Upload failed: {}",
                response.status()
            )));
        }

        let uploaded: UploadedMedia = response.json().await?;
        let _ = progress.send(UploadProgress::Finished);
        tracing::info!(
            "Uploaded {} '{}' as {}",
            request.kind,
            request.file_name,
            uploaded.public_id
        );
        Ok(uploaded)
    }

    async fn delete(&self, target: &MediaDeletion) -> Result<(), AppError> {
        let Some(url) = &self.config.delete_url else {
            tracing::warn!(
                "No deletion backend configured, leaving {} {} on the host",
                target.resource_kind,
                target.identifier
            );
            return Ok(());
        };

        let response = self.client.post(url).json(target).send().await?;

        if !response.status().is_success() {
            return Err(AppError::Transport(format!(
                "Failed to delete {} {}: {}",
                target.resource_kind,
                target.identifier,
                response.status()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_url_per_kind() {
        let host = HttpMediaHost::new(MediaHostConfig {
            api_base: "https://api.example.com/v1_1/".to_string(),
            cloud_name: "househunt".to_string(),
            upload_preset: "preset".to_string(),
            folder: "properties".to_string(),
            delete_url: None,
        })
        .unwrap();

        assert_eq!(
            host.upload_url(MediaKind::Image),
            "https://api.example.com/v1_1/househunt/image/upload"
        );
        assert_eq!(
            host.upload_url(MediaKind::Video),
            "https://api.example.com/v1_1/househunt/video/upload"
        );
    }

    #[tokio::test]
    async fn test_delete_without_backend_is_noop() {
        let host = HttpMediaHost::new(MediaHostConfig {
            api_base: "https://api.example.com/v1_1".to_string(),
            cloud_name: "househunt".to_string(),
            upload_preset: "preset".to_string(),
            folder: "properties".to_string(),
            delete_url: None,
        })
        .unwrap();

        let target = MediaDeletion {
            identifier: "househunt/abc".to_string(),
            resource_kind: MediaKind::Image,
        };
        assert!(host.delete(&target).await.is_ok());
    }
}
