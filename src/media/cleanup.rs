//! Host-side media cleanup for properties being deleted.

use super::codec::extract_media_id;
use super::host::MediaHost;
use crate::models::{MediaDeletion, MediaDocument, MediaItem, MediaKind};

/// Work out which hosted files belong to a property.
///
/// Strategies are tried in order and the first non-empty result wins:
/// the unified `mediaDetails` list, then the split `imageDetails` /
/// `videoDetails` lists, then the bare `photos` / `videos` URLs.
pub fn collect_media_for_deletion(media: &MediaDocument) -> Vec<MediaDeletion> {
    if let Some(details) = &media.media_details {
        let found: Vec<_> = details
            .iter()
            .filter_map(|item| deletion_for(item, item.kind))
            .collect();
        if !found.is_empty() {
            return found;
        }
    }

    if media.image_details.is_some() || media.video_details.is_some() {
        let images = media.image_details.iter().flatten().map(|i| (i, MediaKind::Image));
        let videos = media.video_details.iter().flatten().map(|v| (v, MediaKind::Video));
        let found: Vec<_> = images
            .chain(videos)
            .filter_map(|(item, kind)| deletion_for(item, kind))
            .collect();
        if !found.is_empty() {
            return found;
        }
    }

    let photos = media.photos.iter().map(|u| (u, MediaKind::Image));
    let videos = media.videos.iter().map(|u| (u, MediaKind::Video));
    photos
        .chain(videos)
        .filter_map(|(url, kind)| {
            extract_media_id(url).map(|identifier| MediaDeletion {
                identifier,
                resource_kind: kind,
            })
        })
        .collect()
}

fn deletion_for(item: &MediaItem, kind: MediaKind) -> Option<MediaDeletion> {
    let identifier = item
        .host_id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .or_else(|| extract_media_id(&item.url))?;

    Some(MediaDeletion {
        identifier,
        resource_kind: kind,
    })
}

/// Ask the host to delete every item. Failures are logged and skipped.
pub async fn delete_all(host: &dyn MediaHost, items: &[MediaDeletion]) {
    let mut failed = 0usize;

    for item in items {
        match host.delete(item).await {
            Ok(()) => {
                tracing::debug!("Deleted {} {} from media host", item.resource_kind, item.identifier);
            }
            Err(e) => {
                failed += 1;
                tracing::warn!(
                    "Failed to delete {} {} from media host: {}",
                    item.resource_kind,
                    item.identifier,
                    e
                );
            }
        }
    }

    if !items.is_empty() {
        tracing::info!(
            "Media cleanup finished: {} deleted, {} failed",
            items.len() - failed,
            failed
        );
    }
}
