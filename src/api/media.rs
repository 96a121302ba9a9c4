//! Media upload endpoint.

use axum::extract::{Multipart, State};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::media::{start_upload, validate_media_file, UploadProgress, UploadRequest};
use crate::models::MediaItem;
use crate::AppState;

/// POST /api/media - Upload one file (multipart field `file`) to the media host.
///
/// Returns the metadata record to attach to a property.
pub async fn upload_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<MediaItem> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;
        file = Some((file_name, content_type, data));
        break;
    }

    let (file_name, content_type, data) =
        file.ok_or_else(|| AppError::Validation("Missing file field".to_string()))?;
    let kind = validate_media_file(&content_type, data.len())?;

    let mut task = start_upload(
        state.media.clone(),
        UploadRequest {
            kind,
            file_name: file_name.clone(),
            content_type,
            data,
        },
    );

    let mut last_percent = 0u8;
    while let Some(event) = task.progress.recv().await {
        match event {
            UploadProgress::Started { total } => {
                tracing::debug!("Uploading '{}' ({} bytes)", file_name, total);
            }
            UploadProgress::Sent { .. } => {
                let percent = event.percent();
                if percent >= last_percent.saturating_add(25) || percent == 100 {
                    tracing::debug!("Upload of '{}' at {}%", file_name, percent);
                    last_percent = percent;
                }
            }
            UploadProgress::Finished => {}
        }
    }

    let uploaded = task.finish().await?;
    success(uploaded.into_item(kind, Some(file_name)))
}
