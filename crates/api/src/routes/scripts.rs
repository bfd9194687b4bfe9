//! Route definitions for script management endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::scripts;
use crate::state::AppState;

/// Routes mounted at `/api/v1/scripts`.
///
/// ```text
/// GET    /                          -> list_scripts
/// POST   /                          -> create_script
/// POST   /validate                  -> validate_code
/// GET    /{id}                      -> get_script
/// PUT    /{id}                      -> update_script
/// DELETE /{id}                      -> delete_script
/// POST   /{id}/publish              -> publish_script
/// POST   /{id}/unpublish            -> unpublish_script
/// GET    /{id}/embed                -> get_embed
/// GET    /{id}/preview              -> preview_script
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(scripts::list_scripts).post(scripts::create_script))
        .route("/validate", post(scripts::validate_code))
        .route(
            "/{id}",
            get(scripts::get_script)
                .put(scripts::update_script)
                .delete(scripts::delete_script),
        )
        .route("/{id}/publish", post(scripts::publish_script))
        .route("/{id}/unpublish", post(scripts::unpublish_script))
        .route("/{id}/embed", get(scripts::get_embed))
        .route("/{id}/preview", get(scripts::preview_script))
}
