//! PostgreSQL-backed [`ScriptStore`].

use abinject_core::types::DbId;
use async_trait::async_trait;

use super::{ScriptStore, StoreError};
use crate::models::script::{
    CreateScript, Script, ScriptPage, ScriptQuery, ScriptSummary, UpdateScript,
};
use crate::repositories::ScriptRepo;
use crate::DbPool;

#[derive(Clone)]
pub struct PgScriptStore {
    pool: DbPool,
}

impl PgScriptStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl ScriptStore for PgScriptStore {
    async fn create(&self, input: &CreateScript) -> Result<Script, StoreError> {
        Ok(ScriptRepo::create(&self.pool, input).await?)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Script>, StoreError> {
        Ok(ScriptRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_all(&self) -> Result<Vec<ScriptSummary>, StoreError> {
        Ok(ScriptRepo::list_all(&self.pool).await?)
    }

    async fn search(&self, query: &ScriptQuery) -> Result<ScriptPage, StoreError> {
        let (scripts, total) = ScriptRepo::search(&self.pool, query).await?;
        Ok(ScriptPage::new(scripts, total, query))
    }

    async fn update(&self, id: DbId, input: &UpdateScript) -> Result<Option<Script>, StoreError> {
        Ok(ScriptRepo::update(&self.pool, id, input).await?)
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(ScriptRepo::delete(&self.pool, id).await?)
    }

    async fn publish(&self, id: DbId, candidate: &str) -> Result<Option<Script>, StoreError> {
        Ok(ScriptRepo::publish(&self.pool, id, candidate).await?)
    }

    async fn unpublish(&self, id: DbId) -> Result<Option<Script>, StoreError> {
        Ok(ScriptRepo::unpublish(&self.pool, id).await?)
    }

    async fn find_published_by_public_id(
        &self,
        public_id: &str,
    ) -> Result<Option<Script>, StoreError> {
        Ok(ScriptRepo::find_published_by_public_id(&self.pool, public_id).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
