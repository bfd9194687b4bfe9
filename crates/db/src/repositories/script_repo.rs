//! Repository for the `scripts` table.

use abinject_core::pagination::escape_like;
use abinject_core::publication::ScriptState;
use abinject_core::types::DbId;
use sqlx::PgPool;

use crate::models::script::{CreateScript, Script, ScriptQuery, ScriptSummary, UpdateScript};

/// Column list for `scripts` SELECT queries, including the joined `state` name.
const COLUMNS: &str = "\
    s.id, s.name, s.description, s.code, s.state_id, \
    st.name AS state, \
    s.public_id, s.published_at, s.created_at, s.updated_at";

/// Same as [`COLUMNS`] without `code`, for listings.
const SUMMARY_COLUMNS: &str = "\
    s.id, s.name, s.description, s.state_id, \
    st.name AS state, \
    s.public_id, s.published_at, s.created_at, s.updated_at";

/// Join clause used in all read queries to include the state name.
const JOIN: &str = "scripts s JOIN script_states st ON s.state_id = st.id";

/// Optional case-insensitive filter on name or description. `$1` is a
/// `LIKE` pattern built by [`search_pattern`], or NULL for no filter.
const SEARCH_FILTER: &str = "\
    ($1::TEXT IS NULL \
     OR s.name ILIKE $1 ESCAPE '\\' \
     OR s.description ILIKE $1 ESCAPE '\\')";

/// Most recently modified first; id breaks ties.
const ORDER: &str = "ORDER BY s.updated_at DESC, s.id DESC";

/// Provides CRUD and publication operations for scripts.
pub struct ScriptRepo;

impl ScriptRepo {
    /// Insert a new draft script.
    pub async fn create(pool: &PgPool, dto: &CreateScript) -> Result<Script, sqlx::Error> {
        let query = "\
            INSERT INTO scripts (name, description, code, state_id) \
            VALUES ($1, $2, $3, $4) \
            RETURNING id";

        let id: DbId = sqlx::query_scalar(query)
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(&dto.code)
            .bind(ScriptState::Draft.id())
            .fetch_one(pool)
            .await?;

        // Return the full row with the joined state name.
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a script by its ID, including the joined state name.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Script>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {JOIN} WHERE s.id = $1");
        sqlx::query_as::<_, Script>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every script, most recently modified first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<ScriptSummary>, sqlx::Error> {
        let query = format!("SELECT {SUMMARY_COLUMNS} FROM {JOIN} {ORDER}");
        sqlx::query_as::<_, ScriptSummary>(&query)
            .fetch_all(pool)
            .await
    }

    /// Fetch one page of scripts matching the query, plus the total number
    /// of matches across all pages.
    pub async fn search(
        pool: &PgPool,
        params: &ScriptQuery,
    ) -> Result<(Vec<ScriptSummary>, i64), sqlx::Error> {
        let pattern = params.term().map(search_pattern);

        let count_query = format!("SELECT COUNT(*) FROM {JOIN} WHERE {SEARCH_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&pattern)
            .fetch_one(pool)
            .await?;

        let page_query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM {JOIN} WHERE {SEARCH_FILTER} {ORDER} \
             LIMIT $2 OFFSET $3"
        );
        let scripts = sqlx::query_as::<_, ScriptSummary>(&page_query)
            .bind(&pattern)
            .bind(params.page.page_size)
            .bind(params.page.offset())
            .fetch_all(pool)
            .await?;

        Ok((scripts, total))
    }

    /// Update a script. Only non-`None` fields in the DTO are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        dto: &UpdateScript,
    ) -> Result<Option<Script>, sqlx::Error> {
        let query = "\
            UPDATE scripts SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                code = COALESCE($4, code) \
            WHERE id = $1";

        let rows_affected = sqlx::query(query)
            .bind(id)
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(&dto.code)
            .execute(pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Ok(None);
        }

        Self::find_by_id(pool, id).await
    }

    /// Permanently delete a script. Returns `false` if it did not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let rows = sqlx::query("DELETE FROM scripts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }

    /// Find a script that is currently published under `public_id`.
    pub async fn find_published_by_public_id(
        pool: &PgPool,
        public_id: &str,
    ) -> Result<Option<Script>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM {JOIN} WHERE s.public_id = $1 AND s.state_id = $2");
        sqlx::query_as::<_, Script>(&query)
            .bind(public_id)
            .bind(ScriptState::Published.id())
            .fetch_optional(pool)
            .await
    }

    /// Publish a script in a single statement.
    ///
    /// `candidate` only takes effect when the script has never been
    /// published. A collision with another script's public id surfaces as a
    /// unique violation on `uq_scripts_public_id`.
    pub async fn publish(
        pool: &PgPool,
        id: DbId,
        candidate: &str,
    ) -> Result<Option<Script>, sqlx::Error> {
        let query = "\
            UPDATE scripts SET \
                state_id = $2, \
                public_id = COALESCE(public_id, $3), \
                published_at = NOW() \
            WHERE id = $1";

        let rows_affected = sqlx::query(query)
            .bind(id)
            .bind(ScriptState::Published.id())
            .bind(candidate)
            .execute(pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Ok(None);
        }

        Self::find_by_id(pool, id).await
    }

    /// Revert a script to draft, keeping its public id and `published_at`.
    pub async fn unpublish(pool: &PgPool, id: DbId) -> Result<Option<Script>, sqlx::Error> {
        let rows_affected = sqlx::query("UPDATE scripts SET state_id = $2 WHERE id = $1")
            .bind(id)
            .bind(ScriptState::Draft.id())
            .execute(pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Ok(None);
        }

        Self::find_by_id(pool, id).await
    }
}

/// `%term%` with `LIKE` metacharacters in `term` escaped.
fn search_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_pattern_wraps_and_escapes() {
        assert_eq!(search_pattern("banner"), "%banner%");
        assert_eq!(search_pattern("100%"), "%100\\%%");
    }
}
