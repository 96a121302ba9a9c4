//! Share links and share-token extraction from public URLs.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::models::ShareLinks;

/// Characters left alone by a browser's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const SHORTLIST_SEGMENT: &str = "/shortlist/";

fn encode(text: &str) -> String {
    utf8_percent_encode(text, COMPONENT).to_string()
}

/// Build the direct, WhatsApp and email links for a share token.
pub fn share_links(base_url: &str, share_token: &str) -> ShareLinks {
    let direct = format!(
        "{}{}{}",
        base_url.trim_end_matches('/'),
        SHORTLIST_SEGMENT,
        encode(share_token)
    );

    let whatsapp = format!(
        "https://wa.me/?text={}",
        encode(&format!(
            "Check out these properties I found for you: {}",
            direct
        ))
    );

    let email = format!(
        "mailto:?subject={}&body={}",
        encode("Property Shortlist"),
        encode(&format!(
            "I've created a shortlist of properties that might interest you. Check them out here: {}",
            direct
        ))
    );

    ShareLinks {
        direct,
        whatsapp,
        email,
    }
}

/// Pull the share token out of `/shortlist/<token>` or `#/shortlist/<token>`.
///
/// Anything after the token (query, fragment, further segments) is ignored.
pub fn parse_share_token(url: &str) -> Option<String> {
    let start = url.find(SHORTLIST_SEGMENT)? + SHORTLIST_SEGMENT.len();
    let rest = &url[start..];
    let end = rest.find(['?', '#', '/', '&']).unwrap_or(rest.len());
    let token = rest[..end].trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_links() {
        let links = share_links("https://househunt.example/", "abc-123");

        assert_eq!(links.direct, "https://househunt.example/shortlist/abc-123");
        assert_eq!(
            links.whatsapp,
            "https://wa.me/?text=Check%20out%20these%20properties%20I%20found%20for%20you%3A%20https%3A%2F%2Fhousehunt.example%2Fshortlist%2Fabc-123"
        );
        assert!(links
            .email
            .starts_with("mailto:?subject=Property%20Shortlist&body=I've%20created"));
        assert!(links
            .email
            .ends_with("https%3A%2F%2Fhousehunt.example%2Fshortlist%2Fabc-123"));
    }

    #[test]
    fn test_parse_path_token() {
        assert_eq!(
            parse_share_token("https://househunt.example/shortlist/abc-123"),
            Some("abc-123".to_string())
        );
        assert_eq!(
            parse_share_token("https://househunt.example/shortlist/abc-123?utm=wa"),
            Some("abc-123".to_string())
        );
    }

    #[test]
    fn test_parse_hash_token() {
        assert_eq!(
            parse_share_token("https://househunt.example/#/shortlist/abc-123"),
            Some("abc-123".to_string())
        );
        assert_eq!(
            parse_share_token("#/shortlist/abc-123/extra"),
            Some("abc-123".to_string())
        );
    }

    #[test]
    fn test_parse_missing_token() {
        assert_eq!(parse_share_token("https://househunt.example/gallery"), None);
        assert_eq!(parse_share_token("https://househunt.example/shortlist/"), None);
        assert_eq!(parse_share_token("https://househunt.example/shortlist/?x=1"), None);
    }
}
