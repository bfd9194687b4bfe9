//! In-process [`ScriptStore`] for development and tests.
//!
//! Mirrors the PostgreSQL behavior: new scripts are drafts, public ids are
//! unique across scripts, and listings are ordered by `updated_at` descending.

use std::collections::BTreeMap;

use abinject_core::pagination::contains_ignore_case;
use abinject_core::publication::Publication;
use abinject_core::types::DbId;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{ScriptStore, StoreError};
use crate::models::script::{
    CreateScript, Script, ScriptPage, ScriptQuery, ScriptSummary, UpdateScript,
    PUBLIC_ID_CONSTRAINT,
};

#[derive(Default)]
struct Inner {
    last_id: DbId,
    scripts: BTreeMap<DbId, Script>,
}

impl Inner {
    fn public_id_taken(&self, public_id: &str, except: DbId) -> bool {
        self.scripts
            .values()
            .any(|s| s.id != except && s.public_id.as_deref() == Some(public_id))
    }

    /// Summaries matching `term`, most recently modified first.
    fn sorted_summaries(&self, term: Option<&str>) -> Vec<ScriptSummary> {
        let mut matches: Vec<&Script> = self
            .scripts
            .values()
            .filter(|s| match term {
                None => true,
                Some(term) => {
                    contains_ignore_case(&s.name, term)
                        || s.description
                            .as_deref()
                            .is_some_and(|d| contains_ignore_case(d, term))
                }
            })
            .collect();
        matches.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        matches.into_iter().map(Script::summary).collect()
    }
}

#[derive(Default)]
pub struct MemoryScriptStore {
    inner: RwLock<Inner>,
}

impl MemoryScriptStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScriptStore for MemoryScriptStore {
    async fn create(&self, input: &CreateScript) -> Result<Script, StoreError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let now = Utc::now();
        let publication = Publication::default();
        let script = Script {
            id: inner.last_id,
            name: input.name.clone(),
            description: input.description.clone(),
            code: input.code.clone(),
            state_id: publication.state.id(),
            state: publication.state.name().to_string(),
            public_id: None,
            published_at: None,
            created_at: now,
            updated_at: now,
        };
        inner.scripts.insert(script.id, script.clone());
        Ok(script)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Script>, StoreError> {
        Ok(self.inner.read().await.scripts.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<ScriptSummary>, StoreError> {
        Ok(self.inner.read().await.sorted_summaries(None))
    }

    async fn search(&self, query: &ScriptQuery) -> Result<ScriptPage, StoreError> {
        let all = self.inner.read().await.sorted_summaries(query.term());
        let total = all.len() as i64;
        let offset = usize::try_from(query.page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.page.page_size).unwrap_or(0);
        let scripts = all.into_iter().skip(offset).take(limit).collect();
        Ok(ScriptPage::new(scripts, total, query))
    }

    async fn update(&self, id: DbId, input: &UpdateScript) -> Result<Option<Script>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(script) = inner.scripts.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            script.name = name.clone();
        }
        if let Some(description) = &input.description {
            script.description = Some(description.clone());
        }
        if let Some(code) = &input.code {
            script.code = code.clone();
        }
        script.updated_at = Utc::now();
        Ok(Some(script.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.scripts.remove(&id).is_some())
    }

    async fn publish(&self, id: DbId, candidate: &str) -> Result<Option<Script>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(current) = inner.scripts.get(&id) else {
            return Ok(None);
        };
        let publication = current.publication();
        if publication.needs_public_id() && inner.public_id_taken(candidate, id) {
            return Err(StoreError::UniqueViolation {
                constraint: PUBLIC_ID_CONSTRAINT.to_string(),
            });
        }

        let now = Utc::now();
        let Some(script) = inner.scripts.get_mut(&id) else {
            return Ok(None);
        };
        script.apply_publication(publication.publish(candidate, now));
        script.updated_at = now;
        Ok(Some(script.clone()))
    }

    async fn unpublish(&self, id: DbId) -> Result<Option<Script>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(script) = inner.scripts.get_mut(&id) else {
            return Ok(None);
        };
        script.apply_publication(script.publication().unpublish());
        script.updated_at = Utc::now();
        Ok(Some(script.clone()))
    }

    async fn find_published_by_public_id(
        &self,
        public_id: &str,
    ) -> Result<Option<Script>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .scripts
            .values()
            .find(|s| s.public_id.as_deref() == Some(public_id) && s.is_published())
            .cloned())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
