//! Public shortlist viewer state.

use super::ShortlistService;
use crate::models::ShortlistView;

/// Shown when a token is unknown or its shortlist has been deactivated.
pub const NOT_FOUND_MESSAGE: &str = "Shortlist not found or has expired.";
/// Shown when the store could not be reached.
pub const FAILED_MESSAGE: &str = "Failed to load shortlist. Please try again.";

/// Where a single token resolution stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResolutionState {
    #[default]
    Idle,
    Loading,
    Resolved(ShortlistView),
    NotFound,
    Failed,
}

impl ResolutionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ResolutionState::Resolved(_) | ResolutionState::NotFound | ResolutionState::Failed
        )
    }
}

/// Drives one share token through `Idle -> Loading -> {Resolved | NotFound | Failed}`.
pub struct ShortlistViewer {
    token: String,
    state: ResolutionState,
}

impl ShortlistViewer {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            state: ResolutionState::Idle,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn state(&self) -> &ResolutionState {
        &self.state
    }

    /// User-facing message for the failure states.
    pub fn message(&self) -> Option<&'static str> {
        match self.state {
            ResolutionState::NotFound => Some(NOT_FOUND_MESSAGE),
            ResolutionState::Failed => Some(FAILED_MESSAGE),
            _ => None,
        }
    }

    /// Resolve the token. Callable from any state; a retry starts over from `Loading`.
    pub async fn load(&mut self, service: &ShortlistService) -> &ResolutionState {
        self.state = ResolutionState::Loading;

        let token = self.token.trim();
        self.state = if token.is_empty() {
            ResolutionState::NotFound
        } else {
            match service.resolve(token).await {
                Ok(view) => ResolutionState::Resolved(view),
                Err(e) if e.is_not_found() => ResolutionState::NotFound,
                Err(e) => {
                    tracing::error!("Failed to resolve shortlist token: {}", e);
                    ResolutionState::Failed
                }
            }
        };

        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_database, Repository};
    use crate::models::{Category, CreatePropertyRequest, CreateShortlistRequest};
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn service() -> (ShortlistService, Arc<Repository>, sqlx::SqlitePool, TempDir) {
        let dir = TempDir::new().unwrap();
        let pool = init_database(&dir.path().join("viewer.sqlite")).await.unwrap();
        let repo = Arc::new(Repository::new(pool.clone()));
        (ShortlistService::new(repo.clone()), repo, pool, dir)
    }

    fn property(title: &str) -> CreatePropertyRequest {
        serde_json::from_value(serde_json::json!({
            "title": title,
            "address": "12 Harbour Road",
            "price": 1200,
            "category": Category::OneBedroom.as_str(),
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_resolves_and_drops_missing_properties() {
        let (service, repo, _pool, _dir) = service().await;
        let a = repo.create_property(&property("A")).await.unwrap();
        let b = repo.create_property(&property("B")).await.unwrap();

        let shortlist = service
            .create(&CreateShortlistRequest {
                owner_ref: None,
                property_ids: vec![b.id.clone(), a.id.clone()],
                label: None,
            })
            .await
            .unwrap();
        repo.delete_property(&b.id).await.unwrap();

        let mut viewer = ShortlistViewer::new(shortlist.share_token.clone());
        assert_eq!(viewer.state(), &ResolutionState::Idle);

        match viewer.load(&service).await {
            ResolutionState::Resolved(view) => {
                assert_eq!(view.shortlist.id, shortlist.id);
                assert_eq!(view.properties.len(), 1);
                assert_eq!(view.properties[0].id, a.id);
            }
            other => panic!("unexpected state: {:?}", other),
        }
        assert!(viewer.message().is_none());
    }

    #[tokio::test]
    async fn test_unknown_and_deactivated_tokens_look_the_same() {
        let (service, repo, _pool, _dir) = service().await;
        let a = repo.create_property(&property("A")).await.unwrap();
        let shortlist = service
            .create(&CreateShortlistRequest {
                owner_ref: Some("clients/known".to_string()),
                property_ids: vec![a.id.clone()],
                label: Some("Dana".to_string()),
            })
            .await
            .unwrap();
        service.deactivate(&shortlist.id).await.unwrap();

        let mut unknown = ShortlistViewer::new("no-such-token");
        let mut inactive = ShortlistViewer::new(shortlist.share_token);
        unknown.load(&service).await;
        inactive.load(&service).await;

        assert_eq!(unknown.state(), &ResolutionState::NotFound);
        assert_eq!(inactive.state(), &ResolutionState::NotFound);
        assert_eq!(inactive.message(), Some(NOT_FOUND_MESSAGE));
    }

    #[tokio::test]
    async fn test_store_failure_is_failed() {
        let (service, _repo, pool, _dir) = service().await;
        let mut viewer = ShortlistViewer::new("any-token");

        pool.close().await;
        viewer.load(&service).await;
        assert_eq!(viewer.state(), &ResolutionState::Failed);
        assert_eq!(viewer.message(), Some(FAILED_MESSAGE));
        assert!(viewer.state().is_terminal());
    }

    #[tokio::test]
    async fn test_corrupt_shortlist_is_failed() {
        let (service, repo, pool, _dir) = service().await;
        let a = repo.create_property(&property("A")).await.unwrap();
        let shortlist = service
            .create(&CreateShortlistRequest {
                owner_ref: None,
                property_ids: vec![a.id],
                label: None,
            })
            .await
            .unwrap();
        sqlx::query("UPDATE shortlists SET property_ids = '{' WHERE id = ?")
            .bind(&shortlist.id)
            .execute(&pool)
            .await
            .unwrap();

        let mut viewer = ShortlistViewer::new(shortlist.share_token);
        assert_eq!(viewer.load(&service).await, &ResolutionState::Failed);
    }

    #[tokio::test]
    async fn test_reload_reflects_current_store() {
        let (service, repo, _pool, _dir) = service().await;
        let a = repo.create_property(&property("A")).await.unwrap();
        let shortlist = service
            .create(&CreateShortlistRequest {
                owner_ref: None,
                property_ids: vec![a.id.clone()],
                label: None,
            })
            .await
            .unwrap();

        let mut viewer = ShortlistViewer::new(shortlist.share_token);
        assert!(matches!(
            viewer.load(&service).await,
            ResolutionState::Resolved(_)
        ));

        service.deactivate(&shortlist.id).await.unwrap();
        assert_eq!(viewer.load(&service).await, &ResolutionState::NotFound);
    }

    #[tokio::test]
    async fn test_blank_token_is_not_found() {
        let (service, _repo, _pool, _dir) = service().await;
        let mut viewer = ShortlistViewer::new("   ");
        assert_eq!(viewer.load(&service).await, &ResolutionState::NotFound);
    }
}
