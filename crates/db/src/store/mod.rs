//! Storage abstraction the API is written against.
//!
//! [`PgScriptStore`] is the production backend. [`MemoryScriptStore`] keeps
//! everything in process and backs local development and the API tests.

use abinject_core::types::DbId;
use async_trait::async_trait;
use thiserror::Error;

use crate::models::script::{
    CreateScript, Script, ScriptPage, ScriptQuery, ScriptSummary, UpdateScript,
    PUBLIC_ID_CONSTRAINT,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryScriptStore;
pub use postgres::PgScriptStore;

/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Error, Debug)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    /// Whether the write collided with another script's public id.
    pub fn is_public_id_collision(&self) -> bool {
        matches!(self, Self::UniqueViolation { constraint } if constraint == PUBLIC_ID_CONSTRAINT)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or_default().to_string();
                return Self::UniqueViolation { constraint };
            }
        }
        Self::Database(err)
    }
}

/// Persistence operations for scripts.
///
/// Every method is a single atomic operation: readers never observe a
/// half-applied write.
#[async_trait]
pub trait ScriptStore: Send + Sync {
    /// Insert a new draft script.
    async fn create(&self, input: &CreateScript) -> Result<Script, StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Script>, StoreError>;

    /// Every script, most recently modified first.
    async fn list_all(&self) -> Result<Vec<ScriptSummary>, StoreError>;

    /// One filtered page of scripts, most recently modified first.
    async fn search(&self, query: &ScriptQuery) -> Result<ScriptPage, StoreError>;

    /// Apply a partial update. `None` if the script does not exist.
    async fn update(&self, id: DbId, input: &UpdateScript) -> Result<Option<Script>, StoreError>;

    /// Delete permanently. `false` if the script did not exist.
    async fn delete(&self, id: DbId) -> Result<bool, StoreError>;

    /// Publish, assigning `candidate` as public id unless one is already
    /// assigned. Fails with [`StoreError::UniqueViolation`] on
    /// [`PUBLIC_ID_CONSTRAINT`] when `candidate` belongs to another script.
    async fn publish(&self, id: DbId, candidate: &str) -> Result<Option<Script>, StoreError>;

    /// Revert to draft, keeping the public id.
    async fn unpublish(&self, id: DbId) -> Result<Option<Script>, StoreError>;

    /// The script currently published under `public_id`, if any. Drafts
    /// holding that id are not returned.
    async fn find_published_by_public_id(
        &self,
        public_id: &str,
    ) -> Result<Option<Script>, StoreError>;

    /// Verify the backend is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;
}
