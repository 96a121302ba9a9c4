//! Media models: hosted photo/video items and the document shape a property carries.

use serde::{Deserialize, Serialize};

/// Resource kind on the media host. Determines the upload sub-path and the
/// deletion endpoint.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// Classify an uploaded file by its MIME type.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        if content_type.starts_with("image/") {
            Some(MediaKind::Image)
        } else if content_type.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single hosted media file with the metadata returned by the host at upload time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub url: String,
    /// Host-side identifier; authoritative over anything derived from `url`
    #[serde(default, alias = "publicId", skip_serializing_if = "Option::is_none")]
    pub host_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(default, alias = "size", skip_serializing_if = "Option::is_none")]
    pub byte_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, alias = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(default, alias = "mediaType")]
    pub kind: MediaKind,
}

/// The media block of a property document.
///
/// Older documents carry only the bare `photos`/`videos` URL lists, some carry
/// split `imageDetails`/`videoDetails`, and current ones carry the unified
/// `mediaDetails` list alongside the others. All of them deserialize into this
/// one type; writes always go through [`MediaDocument::from_items`] so the URL
/// lists stay a projection of the metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaDocument {
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_details: Option<Vec<MediaItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_details: Option<Vec<MediaItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_details: Option<Vec<MediaItem>>,
}

impl MediaDocument {
    /// Build the write-time shape from uploaded items.
    pub fn from_items(items: Vec<MediaItem>) -> Self {
        let (videos, images): (Vec<MediaItem>, Vec<MediaItem>) = items
            .iter()
            .cloned()
            .partition(|item| item.kind == MediaKind::Video);

        Self {
            photos: images.iter().map(|i| i.url.clone()).collect(),
            videos: videos.iter().map(|v| v.url.clone()).collect(),
            media_details: Some(items),
            image_details: Some(images),
            video_details: Some(videos),
        }
    }

    /// Shape for clients that only send hosted URLs without metadata.
    pub fn from_urls(photos: Vec<String>, videos: Vec<String>) -> Self {
        Self {
            photos,
            videos,
            ..Default::default()
        }
    }

    /// True when the document references no media at all.
    pub fn is_empty(&self) -> bool {
        let empty = |list: &Option<Vec<MediaItem>>| list.as_ref().map_or(true, |l| l.is_empty());
        self.photos.is_empty()
            && self.videos.is_empty()
            && empty(&self.media_details)
            && empty(&self.image_details)
            && empty(&self.video_details)
    }
}

/// A host-side deletion target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct MediaDeletion {
    pub identifier: String,
    pub resource_kind: MediaKind,
}

/// Result of a successful upload to the media host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadedMedia {
    pub secure_url: String,
    pub public_id: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub duration: Option<f64>,
}

impl UploadedMedia {
    /// Convert into the metadata record stored on a property.
    pub fn into_item(self, kind: MediaKind, original_name: Option<String>) -> MediaItem {
        MediaItem {
            url: self.secure_url,
            host_id: Some(self.public_id),
            original_name,
            byte_size: Some(self.bytes),
            width: self.width,
            height: self.height,
            duration_seconds: self.duration,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(url: &str, kind: MediaKind) -> MediaItem {
        MediaItem {
            url: url.to_string(),
            host_id: None,
            original_name: None,
            byte_size: None,
            width: None,
            height: None,
            duration_seconds: None,
            kind,
        }
    }

    #[test]
    fn test_from_items_projects_urls() {
        let doc = MediaDocument::from_items(vec![
            item("https://h/image/upload/a.jpg", MediaKind::Image),
            item("https://h/video/upload/b.mp4", MediaKind::Video),
            item("https://h/image/upload/c.png", MediaKind::Image),
        ]);

        assert_eq!(
            doc.photos,
            vec!["https://h/image/upload/a.jpg", "https://h/image/upload/c.png"]
        );
        assert_eq!(doc.videos, vec!["https://h/video/upload/b.mp4"]);
        assert_eq!(doc.media_details.as_ref().unwrap().len(), 3);
        assert_eq!(doc.image_details.as_ref().unwrap().len(), 2);
        assert_eq!(doc.video_details.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_legacy_document_deserializes() {
        let doc: MediaDocument = serde_json::from_value(serde_json::json!({
            "photos": ["https://h/image/upload/v1/househunt/a.jpg"],
            "imageDetails": [{
                "url": "https://h/image/upload/v1/househunt/a.jpg",
                "publicId": "househunt/a",
                "size": 2048,
                "mediaType": "image"
            }]
        }))
        .unwrap();

        assert!(doc.videos.is_empty());
        assert!(doc.media_details.is_none());
        let details = doc.image_details.unwrap();
        assert_eq!(details[0].host_id.as_deref(), Some("househunt/a"));
        assert_eq!(details[0].byte_size, Some(2048));
    }

    #[test]
    fn test_is_empty() {
        assert!(MediaDocument::default().is_empty());
        assert!(MediaDocument {
            media_details: Some(vec![]),
            ..Default::default()
        }
        .is_empty());
        assert!(!MediaDocument::from_urls(vec!["u".to_string()], vec![]).is_empty());
    }

    #[test]
    fn test_kind_from_content_type() {
        assert_eq!(MediaKind::from_content_type("image/png"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_content_type("video/mp4"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_content_type("application/pdf"), None);
    }
}
