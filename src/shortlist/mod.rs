//! Shortlist sharing: creation, token resolution, share links and the
//! client-side selection store.

mod links;
mod selection;
mod viewer;

pub use links::{parse_share_token, share_links};
pub use selection::{
    FileSelectionStorage, MemorySelectionStorage, SelectionStorage, ShortlistSelection,
    SELECTION_KEY,
};
pub use viewer::{ResolutionState, ShortlistViewer, FAILED_MESSAGE, NOT_FOUND_MESSAGE};

use std::sync::Arc;

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{CreateShortlistRequest, Shortlist, ShortlistView};

/// Label used when the creator gives none.
pub const DEFAULT_LABEL: &str = "Anonymous Client";

/// Shortlist operations over the document store.
#[derive(Clone)]
pub struct ShortlistService {
    repo: Arc<Repository>,
}

impl ShortlistService {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    /// Persist a new active shortlist with a fresh share token.
    pub async fn create(&self, request: &CreateShortlistRequest) -> Result<Shortlist, AppError> {
        let property_ids = dedupe_ids(&request.property_ids);
        if property_ids.is_empty() {
            return Err(AppError::Validation("Shortlist is empty".to_string()));
        }

        let owner_ref = request
            .owner_ref
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("clients/{}", uuid::Uuid::new_v4()));
        let label = request
            .label
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_LABEL);
        let share_token = uuid::Uuid::new_v4().to_string();

        let shortlist = self
            .repo
            .create_shortlist(&owner_ref, label, &property_ids, &share_token)
            .await?;
        tracing::info!(
            "Created shortlist {} with {} properties",
            shortlist.id,
            shortlist.property_ids.len()
        );
        Ok(shortlist)
    }

    /// Resolve a share token into a view of the properties that still exist.
    ///
    /// Unknown and deactivated tokens fail with the same `NotFound` error.
    /// Every call reads from the store.
    pub async fn resolve(&self, token: &str) -> Result<ShortlistView, AppError> {
        let shortlist = self
            .repo
            .get_shortlist_by_token(token)
            .await?
            .ok_or_else(|| AppError::NotFound("Shortlist not found".to_string()))?;

        let properties = self
            .repo
            .get_properties_by_ids(&shortlist.property_ids)
            .await?;

        let dropped = shortlist.property_ids.len() - properties.len();
        if dropped > 0 {
            tracing::debug!(
                "Shortlist {} references {} properties that no longer exist",
                shortlist.id,
                dropped
            );
        }

        Ok(ShortlistView {
            shortlist,
            properties,
        })
    }

    pub async fn list(&self) -> Result<Vec<Shortlist>, AppError> {
        self.repo.list_shortlists().await
    }

    /// Stop serving a shortlist publicly. Its token is never reused.
    pub async fn deactivate(&self, id: &str) -> Result<(), AppError> {
        self.repo.deactivate_shortlist(id).await?;
        tracing::info!("Deactivated shortlist {}", id);
        Ok(())
    }
}

/// Keep the first occurrence of each id, preserving order.
fn dedupe_ids(ids: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.trim();
        if !id.is_empty() && !unique.iter().any(|u| u == id) {
            unique.push(id.to_string());
        }
    }
    unique
}
