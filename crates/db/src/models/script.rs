//! Script entity models and DTOs.
//!
//! Models for the `scripts` and `script_states` tables.

use abinject_core::publication::{Publication, ScriptState};
use abinject_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Name of the unique constraint guarding `scripts.public_id`.
pub const PUBLIC_ID_CONSTRAINT: &str = "uq_scripts_public_id";

// ---------------------------------------------------------------------------
// Scripts
// ---------------------------------------------------------------------------

/// A stored script, including the joined `state` name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Script {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub code: String,
    pub state_id: i16,
    /// Joined from `script_states.name`.
    pub state: String,
    pub public_id: Option<String>,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Script {
    /// Lifecycle state decoded from `state_id`. Unknown ids read as draft.
    pub fn current_state(&self) -> ScriptState {
        ScriptState::from_id(self.state_id).unwrap_or(ScriptState::Draft)
    }

    /// The publication fields, for applying transitions.
    pub fn publication(&self) -> Publication {
        Publication {
            state: self.current_state(),
            public_id: self.public_id.clone(),
            published_at: self.published_at,
        }
    }

    /// Overwrite the publication fields with the outcome of a transition.
    pub fn apply_publication(&mut self, publication: Publication) {
        self.state_id = publication.state.id();
        self.state = publication.state.name().to_string();
        self.public_id = publication.public_id;
        self.published_at = publication.published_at;
    }

    pub fn is_published(&self) -> bool {
        self.current_state() == ScriptState::Published
    }

    pub fn summary(&self) -> ScriptSummary {
        ScriptSummary {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            state_id: self.state_id,
            state: self.state.clone(),
            public_id: self.public_id.clone(),
            published_at: self.published_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// List projection of a script (everything except `code`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScriptSummary {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub state_id: i16,
    /// Joined from `script_states.name`.
    pub state: String,
    pub public_id: Option<String>,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new script. New scripts always start as drafts.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateScript {
    pub name: String,
    pub description: Option<String>,
    pub code: String,
}

/// DTO for updating an existing script. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateScript {
    pub name: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// A filtered, paginated listing request.
#[derive(Debug, Clone, Default)]
pub struct ScriptQuery {
    /// Case-insensitive substring matched against name or description.
    /// Empty matches everything. Used verbatim (no trimming).
    pub search: String,
    pub page: abinject_core::pagination::PageRequest,
}

impl ScriptQuery {
    /// The search term, or `None` when the listing is unfiltered.
    pub fn term(&self) -> Option<&str> {
        Some(self.search.as_str()).filter(|s| !s.is_empty())
    }
}

/// One page of script summaries.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptPage {
    pub scripts: Vec<ScriptSummary>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl ScriptPage {
    pub fn new(scripts: Vec<ScriptSummary>, total: i64, query: &ScriptQuery) -> Self {
        Self {
            scripts,
            total,
            page: query.page.page,
            page_size: query.page.page_size,
            total_pages: abinject_core::pagination::total_pages(total, query.page.page_size),
        }
    }
}
