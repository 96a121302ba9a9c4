//! Media host URL → host identifier mapping.
//!
//! Host URLs look like
//! `https://<host>/<cloud>/<kind>/upload/[v<digits>/]<folder>/<name>.<ext>`;
//! the identifier is `<folder>/<name>`.

/// Derive the host identifier from a hosted media URL.
///
/// Returns `None` when there is no `upload` segment, nothing follows it, or
/// the remainder is empty. Never panics.
pub fn extract_media_id(url: &str) -> Option<String> {
    let segments: Vec<&str> = url.split('/').collect();
    let upload = segments.iter().position(|s| *s == "upload")?;

    let mut rest = segments.get(upload + 1..).filter(|r| !r.is_empty())?;
    if rest.first().is_some_and(|s| is_version_segment(s)) {
        rest = &rest[1..];
    }

    let joined = rest.join("/");
    let id = strip_extension(&joined);
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// `v` followed by one or more ASCII digits.
fn is_version_segment(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Drop the last `.ext` of the final path segment, if any.
fn strip_extension(path: &str) -> &str {
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[name_start..].rfind('.') {
        Some(dot) => &path[..name_start + dot],
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versioned_url() {
        assert_eq!(
            extract_media_id("https://host/x/image/upload/v1758465858/househunt/abc123.jpg"),
            Some("househunt/abc123".to_string())
        );
    }

    #[test]
    fn test_unversioned_url() {
        assert_eq!(
            extract_media_id("https://host/x/image/upload/househunt/properties/xyz789.png"),
            Some("househunt/properties/xyz789".to_string())
        );
    }

    #[test]
    fn test_only_last_extension_stripped() {
        assert_eq!(
            extract_media_id("https://host/x/video/upload/v12/tours/walk.through.final.mp4"),
            Some("tours/walk.through.final".to_string())
        );
    }

    #[test]
    fn test_version_detected_structurally() {
        // A folder named like "v2beta" is not a version segment.
        assert_eq!(
            extract_media_id("https://host/x/image/upload/v2beta/a.jpg"),
            Some("v2beta/a".to_string())
        );
        // Only one version segment is skipped.
        assert_eq!(
            extract_media_id("https://host/x/image/upload/v1/v2/a.jpg"),
            Some("v2/a".to_string())
        );
    }

    #[test]
    fn test_no_extension() {
        assert_eq!(
            extract_media_id("https://host/x/image/upload/v1/folder/name"),
            Some("folder/name".to_string())
        );
    }

    #[test]
    fn test_malformed_inputs() {
        assert_eq!(extract_media_id(""), None);
        assert_eq!(extract_media_id("not a url"), None);
        assert_eq!(extract_media_id("https://host/x/image/raw/a.jpg"), None);
        assert_eq!(extract_media_id("https://host/x/image/upload"), None);
        assert_eq!(extract_media_id("https://host/x/image/upload/"), None);
        assert_eq!(extract_media_id("https://host/x/image/upload/v123"), None);
        assert_eq!(extract_media_id("https://host/x/image/upload/.jpg"), None);
    }
}
