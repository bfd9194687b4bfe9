//! Public serving endpoint embedded by host pages.
//!
//! Always answers with JavaScript, never with an error page: a host page
//! including the tag must not break whatever happens here.

use abinject_core::public_id::{is_well_formed, strip_public_extension};
use abinject_core::wrapper::{render_not_found_script, render_public_script};
use axum::extract::{Path, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONTENT_TYPE,
    EXPIRES, PRAGMA,
};
use axum::http::{HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use crate::state::AppState;

/// Headers on every public response, hit or miss.
const SCRIPT_HEADERS: [(HeaderName, &str); 6] = [
    (CONTENT_TYPE, "application/javascript; charset=utf-8"),
    (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (ACCESS_CONTROL_ALLOW_METHODS, "GET"),
    (CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
    (PRAGMA, "no-cache"),
    (EXPIRES, "0"),
];

/// GET /public/{identifier} (alias /p/{identifier})
///
/// The identifier may carry a `.js` suffix. Only published scripts are
/// served; drafts, deleted and unknown ids all get the same fallback.
pub async fn serve_script(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Response {
    let public_id = strip_public_extension(&identifier);

    if !is_well_formed(public_id) {
        tracing::debug!(identifier = %public_id, "Malformed public id");
        return script_response(StatusCode::NOT_FOUND, render_not_found_script(public_id));
    }

    match state.store.find_published_by_public_id(public_id).await {
        Ok(Some(script)) => script_response(
            StatusCode::OK,
            render_public_script(public_id, &script.code, Utc::now()),
        ),
        Ok(None) => {
            tracing::debug!(public_id, "No published script");
            script_response(StatusCode::NOT_FOUND, render_not_found_script(public_id))
        }
        Err(err) => {
            tracing::error!(public_id, error = %err, "Failed to load public script");
            script_response(
                StatusCode::SERVICE_UNAVAILABLE,
                render_not_found_script(public_id),
            )
        }
    }
}

fn script_response(status: StatusCode, body: String) -> Response {
    (status, SCRIPT_HEADERS, body).into_response()
}
