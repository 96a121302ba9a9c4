//! Shortlist models: shared, token-addressed selections of properties.

use serde::{Deserialize, Serialize};

use super::{Availability, Category, Property};

/// A persisted shortlist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Shortlist {
    pub id: String,
    /// Owning client reference; synthesized when the creator supplied none
    pub owner_ref: String,
    pub label: String,
    pub property_ids: Vec<String>,
    pub share_token: String,
    pub is_active: bool,
    pub created_at: String,
}

/// Request body for creating a shortlist.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShortlistRequest {
    #[serde(default, alias = "clientId")]
    pub owner_ref: Option<String>,
    pub property_ids: Vec<String>,
    #[serde(default, alias = "clientName")]
    pub label: Option<String>,
}

/// Links a shortlist can be shared through.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShareLinks {
    pub direct: String,
    pub whatsapp: String,
    pub email: String,
}

/// Response for a freshly created shortlist.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedShortlist {
    #[serde(flatten)]
    pub shortlist: Shortlist,
    pub links: ShareLinks,
}

/// A shortlist with its property ids resolved to full records.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShortlistView {
    #[serde(flatten)]
    pub shortlist: Shortlist,
    /// Records still present in the store, in shortlist order
    pub properties: Vec<Property>,
}

/// Teaser of a property shown to anonymous holders of a share token.
///
/// Contact details, notes, the street address and the price stay private.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicProperty {
    pub id: String,
    pub title: String,
    pub general_area: String,
    pub category: Category,
    pub availability: Availability,
    pub photos: Vec<String>,
    pub videos: Vec<String>,
}

impl From<&Property> for PublicProperty {
    fn from(property: &Property) -> Self {
        Self {
            id: property.id.clone(),
            title: property.title.clone(),
            general_area: general_area(&property.address),
            category: property.category,
            availability: property.availability,
            photos: property.media.photos.clone(),
            videos: property.media.videos.clone(),
        }
    }
}

/// Body served to anonymous holders of a share token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicShortlistResponse {
    pub id: String,
    pub label: String,
    pub created_at: String,
    pub properties: Vec<PublicProperty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_contact: Option<String>,
}

impl PublicShortlistResponse {
    pub fn new(view: &ShortlistView, agent_contact: Option<String>) -> Self {
        Self {
            id: view.shortlist.id.clone(),
            label: view.shortlist.label.clone(),
            created_at: view.shortlist.created_at.clone(),
            properties: view.properties.iter().map(PublicProperty::from).collect(),
            agent_contact,
        }
    }
}

/// Coarse location for public listings: the address up to its first comma,
/// suffixed with "Area".
pub fn general_area(address: &str) -> String {
    let first = address.split(',').next().unwrap_or_default().trim();
    if first.is_empty() {
        "Nairobi Area".to_string()
    } else if first.ends_with("Area") {
        first.to_string()
    } else {
        format!("{} Area", first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_area() {
        assert_eq!(
            general_area("12 Riverside Drive, Westlands, Nairobi"),
            "12 Riverside Drive Area"
        );
        assert_eq!(general_area("Kilimani"), "Kilimani Area");
        assert_eq!(general_area("Lavington Area, Nairobi"), "Lavington Area");
        assert_eq!(general_area(""), "Nairobi Area");
        assert_eq!(general_area("  , Nairobi"), "Nairobi Area");
    }
}
