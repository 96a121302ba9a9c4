//! Cancellable uploads with a progress event stream.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::host::{MediaHost, UploadRequest};
use crate::errors::AppError;
use crate::models::{MediaKind, UploadedMedia};

/// Largest accepted image, in bytes.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
/// Largest accepted video, in bytes.
pub const MAX_VIDEO_BYTES: usize = 50 * 1024 * 1024;

const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];
const VIDEO_TYPES: &[&str] = &[
    "video/mp4",
    "video/webm",
    "video/mov",
    "video/avi",
    "video/quicktime",
];

/// Discrete progress events emitted while an upload runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum UploadProgress {
    Started { total: u64 },
    Sent { sent: u64, total: u64 },
    Finished,
}

impl UploadProgress {
    /// Whole percent of the body handed to the transport.
    pub fn percent(&self) -> u8 {
        match self {
            UploadProgress::Started { .. } => 0,
            UploadProgress::Sent { sent, total } if *total > 0 => {
                ((sent * 100) / total).min(100) as u8
            }
            UploadProgress::Sent { .. } | UploadProgress::Finished => 100,
        }
    }
}

/// A running upload.
///
/// Progress events arrive on `progress`; the channel closes when the upload
/// ends. Dropping the task does not stop the upload, [`UploadTask::cancel`] does.
pub struct UploadTask {
    pub progress: mpsc::UnboundedReceiver<UploadProgress>,
    handle: JoinHandle<Result<UploadedMedia, AppError>>,
}

impl UploadTask {
    /// Abort the upload. A later [`UploadTask::finish`] reports cancellation.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Wait for the upload to complete.
    pub async fn finish(self) -> Result<UploadedMedia, AppError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(AppError::Transport("Upload cancelled".to_string())),
            Err(e) => Err(AppError::Internal(format!("Upload task failed: {}", e))),
        }
    }
}

/// Spawn an upload on the runtime and hand back its progress stream.
pub fn start_upload(host: Arc<dyn MediaHost>, request: UploadRequest) -> UploadTask {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(async move { host.upload(request, tx).await });
    UploadTask {
        progress: rx,
        handle,
    }
}

/// Check type and size limits before anything is sent to the host.
pub fn validate_media_file(content_type: &str, size: usize) -> Result<MediaKind, AppError> {
    let kind = if IMAGE_TYPES.contains(&content_type) {
        MediaKind::Image
    } else if VIDEO_TYPES.contains(&content_type) {
        MediaKind::Video
    } else {
        return Err(AppError::Validation(format!(
            "Unsupported file type: {}",
            content_type
        )));
    };

    let limit = match kind {
        MediaKind::Image => MAX_IMAGE_BYTES,
        MediaKind::Video => MAX_VIDEO_BYTES,
    };
    if size > limit {
        return Err(AppError::Validation(format!(
            "File too large: {:.1}MB (max {}MB for {}s)",
            size as f64 / 1024.0 / 1024.0,
            limit / 1024 / 1024,
            kind
        )));
    }

    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaDeletion;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::time::Duration;

    struct SlowHost;

    #[async_trait]
    impl MediaHost for SlowHost {
        async fn upload(
            &self,
            request: UploadRequest,
            progress: mpsc::UnboundedSender<UploadProgress>,
        ) -> Result<UploadedMedia, AppError> {
            let total = request.data.len() as u64;
            let _ = progress.send(UploadProgress::Started { total });
            let _ = progress.send(UploadProgress::Sent { sent: total / 2, total });
            if request.file_name == "stall.jpg" {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            let _ = progress.send(UploadProgress::Sent { sent: total, total });
            let _ = progress.send(UploadProgress::Finished);
            Ok(UploadedMedia {
                secure_url: format!("https://host/x/image/upload/v1/properties/{}", request.file_name),
                public_id: "properties/photo".to_string(),
                bytes: total,
                width: None,
                height: None,
                duration: None,
            })
        }

        async fn delete(&self, _target: &MediaDeletion) -> Result<(), AppError> {
            Ok(())
        }
    }

    fn request(name: &str) -> UploadRequest {
        UploadRequest {
            kind: MediaKind::Image,
            file_name: name.to_string(),
            content_type: "image/jpeg".to_string(),
            data: Bytes::from(vec![0u8; 1000]),
        }
    }

    #[tokio::test]
    async fn test_progress_events_in_order() {
        let mut task = start_upload(Arc::new(SlowHost), request("photo.jpg"));

        let mut events = Vec::new();
        while let Some(event) = task.progress.recv().await {
            events.push(event);
        }

        assert_eq!(
            events,
            vec![
                UploadProgress::Started { total: 1000 },
                UploadProgress::Sent { sent: 500, total: 1000 },
                UploadProgress::Sent { sent: 1000, total: 1000 },
                UploadProgress::Finished,
            ]
        );
        assert_eq!(events[1].percent(), 50);

        let uploaded = task.finish().await.unwrap();
        assert_eq!(uploaded.bytes, 1000);
    }

    #[tokio::test]
    async fn test_cancel_reports_transport_error() {
        let mut task = start_upload(Arc::new(SlowHost), request("stall.jpg"));

        // Wait until the upload is underway, then abort it.
        assert!(matches!(
            task.progress.recv().await,
            Some(UploadProgress::Started { .. })
        ));
        task.cancel();

        let result = task.finish().await;
        assert!(matches!(result, Err(AppError::Transport(_))));
    }

    #[test]
    fn test_validate_media_file() {
        assert_eq!(
            validate_media_file("image/png", 1024).unwrap(),
            MediaKind::Image
        );
        assert_eq!(
            validate_media_file("video/quicktime", 20 * 1024 * 1024).unwrap(),
            MediaKind::Video
        );
        assert!(validate_media_file("image/png", MAX_IMAGE_BYTES + 1).is_err());
        assert!(validate_media_file("video/mp4", MAX_VIDEO_BYTES + 1).is_err());
        assert!(validate_media_file("application/pdf", 10).is_err());
    }
}
