use axum::routing::get;
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Public script routes (root level, outside `/api/v1` and its CORS policy).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/public/{identifier}", get(public::serve_script))
        .route("/p/{identifier}", get(public::serve_script))
}
