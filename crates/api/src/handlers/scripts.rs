//! Management handlers for authoring and publishing scripts.

use abinject_core::embed::{public_script_url, script_tag};
use abinject_core::error::CoreError;
use abinject_core::public_id::{generate_public_id, MAX_PUBLIC_ID_ATTEMPTS};
use abinject_core::syntax::{check_syntax, SyntaxReport};
use abinject_core::types::DbId;
use abinject_core::wrapper::wrap_code;
use abinject_db::models::script::{CreateScript, Script, ScriptPage, ScriptSummary, UpdateScript};
use abinject_db::store::ScriptStore;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::query::ListScriptsParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for creating a script.
///
/// Fields are optional here so missing ones produce a validation error in
/// the standard envelope rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct CreateScriptRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
}

impl CreateScriptRequest {
    fn into_dto(self) -> Result<CreateScript, CoreError> {
        let name = self
            .name
            .ok_or_else(|| CoreError::Validation("name is required".to_string()))?;
        validate_name(&name)?;
        let code = self
            .code
            .ok_or_else(|| CoreError::Validation("code is required".to_string()))?;

        Ok(CreateScript {
            name,
            description: self.description,
            code,
        })
    }
}

/// Request body for the syntax check endpoint.
#[derive(Debug, Deserialize)]
pub struct ValidateCodeRequest {
    pub code: String,
}

/// `GET /scripts` returns the full list, or one page when any of
/// `search`, `page`, `pageSize` is given.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ScriptListing {
    All(Vec<ScriptSummary>),
    Page(ScriptPage),
}

/// Snippet for embedding a published script in a host page.
#[derive(Debug, Serialize)]
pub struct EmbedInfo {
    pub public_id: String,
    pub public_url: String,
    pub script_tag: String,
}

fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("name must not be blank".to_string()));
    }
    Ok(())
}

fn script_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "script",
        id,
    })
}

// ---------------------------------------------------------------------------
// Script CRUD handlers
// ---------------------------------------------------------------------------

/// POST /scripts
///
/// Create a new draft script.
pub async fn create_script(
    State(state): State<AppState>,
    payload: Result<Json<CreateScriptRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<Script>>)> {
    let Json(request) = payload?;
    let input = request.into_dto()?;

    let script = state.store.create(&input).await?;
    tracing::info!(script_id = script.id, name = %script.name, "Script created");

    Ok((StatusCode::CREATED, Json(DataResponse::new(script))))
}

/// GET /scripts
///
/// List scripts, most recently modified first. Supports `?search=` (case
/// insensitive substring of name or description), `?page=` and
/// `?pageSize=`.
pub async fn list_scripts(
    State(state): State<AppState>,
    params: Result<Query<ListScriptsParams>, QueryRejection>,
) -> AppResult<Json<DataResponse<ScriptListing>>> {
    let Query(params) = params?;

    let listing = if params.is_paginated() {
        ScriptListing::Page(state.store.search(&params.to_query()).await?)
    } else {
        ScriptListing::All(state.store.list_all().await?)
    };

    Ok(Json(DataResponse::new(listing)))
}

/// GET /scripts/{id}
pub async fn get_script(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Script>>> {
    let script = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| script_not_found(id))?;

    Ok(Json(DataResponse::new(script)))
}

/// PUT /scripts/{id}
///
/// Partial update of name, description and code. Publication state is
/// unaffected; a published script serves the new code immediately.
pub async fn update_script(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    payload: Result<Json<UpdateScript>, JsonRejection>,
) -> AppResult<Json<DataResponse<Script>>> {
    let Json(input) = payload?;
    if let Some(name) = &input.name {
        validate_name(name)?;
    }

    let script = state
        .store
        .update(id, &input)
        .await?
        .ok_or_else(|| script_not_found(id))?;
    tracing::info!(script_id = id, "Script updated");

    Ok(Json(DataResponse::new(script)))
}

/// DELETE /scripts/{id}
///
/// Permanent. A published script stops being served immediately.
pub async fn delete_script(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<()>>> {
    if !state.store.delete(id).await? {
        return Err(script_not_found(id));
    }
    tracing::info!(script_id = id, "Script deleted");

    Ok(Json(DataResponse::new(())))
}

// ---------------------------------------------------------------------------
// Publication handlers
// ---------------------------------------------------------------------------

/// POST /scripts/{id}/publish
///
/// Assigns a public id on first publish; later publishes keep it.
pub async fn publish_script(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Script>>> {
    let script = publish_with_retry(state.store.as_ref(), id, generate_public_id).await?;
    tracing::info!(
        script_id = id,
        public_id = script.public_id.as_deref().unwrap_or_default(),
        "Script published"
    );

    Ok(Json(DataResponse::new(script)))
}

/// POST /scripts/{id}/unpublish
///
/// Reverts to draft. The public id stays reserved for a later republish.
pub async fn unpublish_script(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Script>>> {
    let script = state
        .store
        .unpublish(id)
        .await?
        .ok_or_else(|| script_not_found(id))?;
    tracing::info!(script_id = id, "Script unpublished");

    Ok(Json(DataResponse::new(script)))
}

/// Publish `id`, drawing a fresh candidate from `generate` each time the
/// store reports a public id collision, up to [`MAX_PUBLIC_ID_ATTEMPTS`].
pub async fn publish_with_retry(
    store: &dyn ScriptStore,
    id: DbId,
    mut generate: impl FnMut() -> String + Send,
) -> AppResult<Script> {
    for attempt in 1..=MAX_PUBLIC_ID_ATTEMPTS {
        let candidate = generate();
        match store.publish(id, &candidate).await {
            Ok(Some(script)) => return Ok(script),
            Ok(None) => return Err(script_not_found(id)),
            Err(err) if err.is_public_id_collision() => {
                tracing::warn!(script_id = id, attempt, "Public id collision, retrying");
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(AppError::Core(CoreError::Conflict(format!(
        "could not assign a unique public id after {MAX_PUBLIC_ID_ATTEMPTS} attempts"
    ))))
}

// ---------------------------------------------------------------------------
// Authoring helpers
// ---------------------------------------------------------------------------

/// POST /scripts/validate
///
/// Best-effort syntax check. Invalid code is reported in the payload, never
/// as an HTTP error.
pub async fn validate_code(
    payload: Result<Json<ValidateCodeRequest>, JsonRejection>,
) -> AppResult<Json<DataResponse<SyntaxReport>>> {
    let Json(request) = payload?;
    Ok(Json(DataResponse::new(check_syntax(&request.code))))
}

/// GET /scripts/{id}/embed
///
/// Embed URL and `<script>` tag. 404 until the script has been published
/// at least once.
pub async fn get_embed(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EmbedInfo>>> {
    let script = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| script_not_found(id))?;

    let public_id = script.public_id.ok_or(AppError::Core(CoreError::NotFound {
        entity: "public id for script",
        id,
    }))?;

    let base_url = &state.config.public_base_url;
    Ok(Json(DataResponse::new(EmbedInfo {
        public_url: public_script_url(base_url, &public_id),
        script_tag: script_tag(base_url, &public_id),
        public_id,
    })))
}

/// GET /scripts/{id}/preview
///
/// The wrapped code exactly as the public endpoint would serve it, without
/// the banner. Works for drafts.
pub async fn preview_script(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let script = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| script_not_found(id))?;

    Ok((
        [(CONTENT_TYPE, "text/javascript; charset=utf-8")],
        wrap_code(&script.code),
    ))
}
