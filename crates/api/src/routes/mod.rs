pub mod health;
pub mod public;
pub mod scripts;

use axum::Router;

use crate::state::AppState;

/// Build the management API router (mounted at `/api/v1`).
///
/// Route tree:
/// ```text
/// /scripts                         list, create
/// /scripts/validate                syntax check (POST)
/// /scripts/{id}                    get, update, delete
/// /scripts/{id}/publish            publish (POST)
/// /scripts/{id}/unpublish          unpublish (POST)
/// /scripts/{id}/embed              embed snippet
/// /scripts/{id}/preview            wrapped code preview
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/scripts", scripts::router())
}
