//! Shortlist API endpoints, admin and public.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    CreateShortlistRequest, CreatedShortlist, PublicShortlistResponse, Shortlist,
};
use crate::shortlist::{
    share_links, ResolutionState, ShortlistViewer, FAILED_MESSAGE, NOT_FOUND_MESSAGE,
};
use crate::AppState;

/// GET /api/shortlists - List all shortlists, newest first.
pub async fn list_shortlists(State(state): State<AppState>) -> ApiResult<Vec<Shortlist>> {
    success(state.shortlists.list().await?)
}

/// POST /api/shortlists - Create a shortlist and return its share links.
pub async fn create_shortlist(
    State(state): State<AppState>,
    Json(request): Json<CreateShortlistRequest>,
) -> ApiResult<CreatedShortlist> {
    let shortlist = state.shortlists.create(&request).await?;
    let links = share_links(&state.config.public_base_url, &shortlist.share_token);
    success(CreatedShortlist { shortlist, links })
}

/// DELETE /api/shortlists/:id - Deactivate a shortlist. Its token stops resolving.
pub async fn deactivate_shortlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.shortlists.deactivate(&id).await?;
    success(())
}

/// GET /public/shortlists/:token - Resolve a share token for an anonymous viewer.
///
/// Failures carry only the fixed user-facing messages.
pub async fn get_public_shortlist(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<PublicShortlistResponse> {
    let mut viewer = ShortlistViewer::new(token);

    match viewer.load(&state.shortlists).await {
        ResolutionState::Resolved(view) => success(PublicShortlistResponse::new(
            view,
            state.config.agent_contact.clone(),
        )),
        ResolutionState::NotFound => Err(AppError::NotFound(NOT_FOUND_MESSAGE.to_string())),
        _ => Err(AppError::Internal(FAILED_MESSAGE.to_string())),
    }
}
