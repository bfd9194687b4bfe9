//! Draft/published lifecycle of a script.
//!
//! The state ids must match the seed data in
//! `20260301000001_create_script_states_table.sql`.
//!
//! Transitions here are pure; the stores apply the same rules as one atomic
//! write so a failed write never leaves a half-applied transition.

use serde::Serialize;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

/// Lifecycle state of a script.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptState {
    /// Not publicly servable. Initial state of every script.
    Draft = 1,
    /// Servable through its public id.
    Published = 2,
}

impl ScriptState {
    /// Return the database state ID.
    pub fn id(self) -> i16 {
        self as i16
    }

    /// Name as stored in `script_states.name`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(Self::Draft),
            2 => Some(Self::Published),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            _ => None,
        }
    }
}

impl From<ScriptState> for i16 {
    fn from(value: ScriptState) -> Self {
        value as i16
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// The publication-related fields of a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    pub state: ScriptState,
    pub public_id: Option<String>,
    pub published_at: Option<Timestamp>,
}

impl Default for Publication {
    /// A freshly created script: draft, never published.
    fn default() -> Self {
        Self {
            state: ScriptState::Draft,
            public_id: None,
            published_at: None,
        }
    }
}

impl Publication {
    /// Publish. An already assigned public id is kept; `candidate` is only
    /// used the first time. `published_at` is refreshed on every publish.
    pub fn publish(&self, candidate: &str, now: Timestamp) -> Self {
        Self {
            state: ScriptState::Published,
            public_id: Some(
                self.public_id
                    .clone()
                    .unwrap_or_else(|| candidate.to_string()),
            ),
            published_at: Some(now),
        }
    }

    /// Revert to draft. The public id stays reserved for this script.
    pub fn unpublish(&self) -> Self {
        Self {
            state: ScriptState::Draft,
            public_id: self.public_id.clone(),
            published_at: self.published_at,
        }
    }

    /// Whether publishing would consume a freshly generated public id.
    pub fn needs_public_id(&self) -> bool {
        self.public_id.is_none()
    }

    /// Whether the script may be served through its public id right now.
    pub fn is_servable(&self) -> bool {
        self.state == ScriptState::Published && self.public_id.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
