//! Property model and its request/filter types.

use serde::{Deserialize, Deserializer, Serialize};

use super::MediaDocument;
use super::MediaItem;

/// Listing category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Category {
    Studio,
    Bedsitter,
    #[serde(rename = "1Bedroom", alias = "1BR")]
    OneBedroom,
    #[serde(rename = "2Bedroom", alias = "2BR")]
    TwoBedroom,
    #[serde(rename = "3Bedroom", alias = "3BR")]
    ThreeBedroom,
    #[serde(rename = "4Bedroom", alias = "4BR")]
    FourBedroom,
    Maisonette,
    Bungalow,
    Townhouse,
    Duplex,
    Penthouse,
    Villa,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Studio => "Studio",
            Category::Bedsitter => "Bedsitter",
            Category::OneBedroom => "1Bedroom",
            Category::TwoBedroom => "2Bedroom",
            Category::ThreeBedroom => "3Bedroom",
            Category::FourBedroom => "4Bedroom",
            Category::Maisonette => "Maisonette",
            Category::Bungalow => "Bungalow",
            Category::Townhouse => "Townhouse",
            Category::Duplex => "Duplex",
            Category::Penthouse => "Penthouse",
            Category::Villa => "Villa",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Studio" => Some(Category::Studio),
            "Bedsitter" => Some(Category::Bedsitter),
            "1Bedroom" | "1BR" => Some(Category::OneBedroom),
            "2Bedroom" | "2BR" => Some(Category::TwoBedroom),
            "3Bedroom" | "3BR" => Some(Category::ThreeBedroom),
            "4Bedroom" | "4BR" => Some(Category::FourBedroom),
            "Maisonette" => Some(Category::Maisonette),
            "Bungalow" => Some(Category::Bungalow),
            "Townhouse" => Some(Category::Townhouse),
            "Duplex" => Some(Category::Duplex),
            "Penthouse" => Some(Category::Penthouse),
            "Villa" => Some(Category::Villa),
            _ => None,
        }
    }
}

/// Whether a listing can still be let. Stored and emitted lowercase; any
/// casing is accepted on input.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    #[default]
    Available,
    Taken,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Available => "available",
            Availability::Taken => "taken",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Some(Availability::Available),
            "taken" => Some(Availability::Taken),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Availability::Available => Availability::Taken,
            Availability::Taken => Availability::Available,
        }
    }
}

impl<'de> Deserialize<'de> for Availability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Availability::parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "unknown availability '{}', expected 'available' or 'taken'",
                raw
            ))
        })
    }
}

/// A property listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub title: String,
    pub address: String,
    pub price: i64,
    pub category: Category,
    pub availability: Availability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landlord_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub media: MediaDocument,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Request body for creating a property.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyRequest {
    pub title: String,
    pub address: String,
    pub price: i64,
    #[serde(alias = "type")]
    pub category: Category,
    #[serde(default)]
    pub availability: Option<Availability>,
    #[serde(default)]
    pub landlord_contact: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Uploaded media with host metadata
    #[serde(default)]
    pub media: Vec<MediaItem>,
    /// Bare hosted URLs, accepted from clients that do not send metadata
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
}

impl CreatePropertyRequest {
    /// The media document to persist. Metadata wins over bare URLs.
    pub fn media_document(&self) -> MediaDocument {
        if self.media.is_empty() {
            MediaDocument::from_urls(self.photos.clone(), self.videos.clone())
        } else {
            MediaDocument::from_items(self.media.clone())
        }
    }
}

/// Request body for a partial property update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePropertyRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default, alias = "type")]
    pub category: Option<Category>,
    #[serde(default)]
    pub availability: Option<Availability>,
    /// `null` or a blank string clears the field
    #[serde(default, deserialize_with = "clearable")]
    pub landlord_contact: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable")]
    pub notes: Option<Option<String>>,
    /// Replaces the whole media set when present
    #[serde(default)]
    pub media: Option<Vec<MediaItem>>,
}

/// Present-but-empty means "clear"; an absent field never reaches here.
fn clearable<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Option<String>>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(Some(value.filter(|v| !v.trim().is_empty())))
}

/// Listing filters for the property gallery.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFilter {
    /// Keyword matched against title, notes and address
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "type")]
    pub category: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub min_price: Option<i64>,
    #[serde(default)]
    pub max_price: Option<i64>,
}

impl PropertyFilter {
    pub fn matches(&self, property: &Property) -> bool {
        let contains = |haystack: &str, needle: &str| {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        };

        let keyword_ok = match non_blank(&self.q) {
            None => true,
            Some(k) => {
                contains(&property.title, k)
                    || contains(&property.address, k)
                    || property.notes.as_deref().is_some_and(|n| contains(n, k))
            }
        };

        let location_ok =
            non_blank(&self.location).map_or(true, |l| contains(&property.address, l));

        let category_ok = non_blank(&self.category)
            .map_or(true, |c| Category::parse(c) == Some(property.category));

        let availability_ok = non_blank(&self.availability)
            .map_or(true, |a| property.availability.as_str().eq_ignore_ascii_case(a));

        let min_ok = self.min_price.map_or(true, |min| property.price >= min);
        let max_ok = self.max_price.map_or(true, |max| property.price <= max);

        keyword_ok && location_ok && category_ok && availability_ok && min_ok && max_ok
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Request body for bulk deletion.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteRequest {
    pub ids: Vec<String>,
}

/// Per-id result of a bulk deletion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
