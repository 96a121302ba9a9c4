//! Property catalog: store operations that span the database and the media host.

use std::sync::Arc;

use crate::db::Repository;
use crate::errors::AppError;
use crate::media::{collect_media_for_deletion, delete_all, MediaHost};
use crate::models::{
    CreatePropertyRequest, DeleteOutcome, Property, PropertyFilter, UpdatePropertyRequest,
};

/// Property operations used by the admin API.
#[derive(Clone)]
pub struct Catalog {
    repo: Arc<Repository>,
    media: Arc<dyn MediaHost>,
}

impl Catalog {
    pub fn new(repo: Arc<Repository>, media: Arc<dyn MediaHost>) -> Self {
        Self { repo, media }
    }

    /// Validate and insert a new property.
    pub async fn create(&self, request: &CreatePropertyRequest) -> Result<Property, AppError> {
        validate_create(request)?;
        let property = self.repo.create_property(request).await?;
        tracing::info!("Created property {} ({})", property.id, property.title);
        Ok(property)
    }

    /// All properties, unordered.
    pub async fn list(&self) -> Result<Vec<Property>, AppError> {
        self.repo.list_properties().await
    }

    /// Properties matching `filter`, newest first.
    pub async fn search(&self, filter: &PropertyFilter) -> Result<Vec<Property>, AppError> {
        let mut properties: Vec<Property> = self
            .list()
            .await?
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect();
        properties.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(properties)
    }

    pub async fn get(&self, id: &str) -> Result<Property, AppError> {
        self.repo
            .get_property(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Property {} not found", id)))
    }

    pub async fn update(
        &self,
        id: &str,
        request: &UpdatePropertyRequest,
    ) -> Result<Property, AppError> {
        validate_update(request)?;
        self.repo.update_property(id, request).await
    }

    /// Flip a property between available and taken.
    pub async fn toggle_availability(&self, id: &str) -> Result<Property, AppError> {
        let current = self.get(id).await?;
        let request = UpdatePropertyRequest {
            availability: Some(current.availability.toggled()),
            ..Default::default()
        };
        self.repo.update_property(id, &request).await
    }

    /// Delete a property and, best effort, its hosted media.
    ///
    /// Media failures are logged and never stop the record removal.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let property = self.get(id).await?;

        let targets = collect_media_for_deletion(&property.media);
        tracing::debug!("Property {} owns {} hosted files", id, targets.len());
        delete_all(self.media.as_ref(), &targets).await;

        self.repo.delete_property(id).await?;
        tracing::info!("Deleted property {}", id);
        Ok(())
    }

    /// Delete each id independently and report per-id outcomes.
    pub async fn delete_many(&self, ids: &[String]) -> Vec<DeleteOutcome> {
        let mut outcomes = Vec::with_capacity(ids.len());

        for id in ids {
            match self.delete(id).await {
                Ok(()) => outcomes.push(DeleteOutcome {
                    id: id.clone(),
                    success: true,
                    error: None,
                }),
                Err(e) => {
                    tracing::warn!("Failed to delete property {}: {}", id, e);
                    outcomes.push(DeleteOutcome {
                        id: id.clone(),
                        success: false,
                        error: Some(e.message()),
                    });
                }
            }
        }

        let failed = outcomes.iter().filter(|o| !o.success).count();
        tracing::info!(
            "Bulk delete completed: {} successful, {} failed",
            outcomes.len() - failed,
            failed
        );
        outcomes
    }
}

fn validate_create(request: &CreatePropertyRequest) -> Result<(), AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if request.address.trim().is_empty() {
        return Err(AppError::Validation("Address is required".to_string()));
    }
    if request.price <= 0 {
        return Err(AppError::Validation("Price must be positive".to_string()));
    }
    if request.media_document().is_empty() {
        return Err(AppError::Validation(
            "At least one image or video is required".to_string(),
        ));
    }
    Ok(())
}

fn validate_update(request: &UpdatePropertyRequest) -> Result<(), AppError> {
    if request.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::Validation("Title cannot be empty".to_string()));
    }
    if request.address.as_deref().is_some_and(|a| a.trim().is_empty()) {
        return Err(AppError::Validation("Address cannot be empty".to_string()));
    }
    if request.price.is_some_and(|p| p <= 0) {
        return Err(AppError::Validation("Price must be positive".to_string()));
    }
    if request.media.as_ref().is_some_and(|m| m.is_empty()) {
        return Err(AppError::Validation(
            "At least one image or video is required".to_string(),
        ));
    }
    Ok(())
}
