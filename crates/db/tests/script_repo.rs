//! Integration tests for `ScriptRepo` against a real PostgreSQL database.
//!
//! Requires `DATABASE_URL` pointing at a server the test user may create
//! databases on.

use abinject_core::pagination::PageRequest;
use abinject_db::models::script::{CreateScript, ScriptQuery, UpdateScript};
use abinject_db::repositories::ScriptRepo;
use abinject_db::store::StoreError;
use assert_matches::assert_matches;
use sqlx::PgPool;

fn new_script(name: &str, description: Option<&str>) -> CreateScript {
    CreateScript {
        name: name.to_string(),
        description: description.map(str::to_string),
        code: "console.log('hello');".to_string(),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_seeded_states(pool: PgPool) {
    let names: Vec<(i16, String)> =
        sqlx::query_as("SELECT id, name FROM script_states ORDER BY id")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(
        names,
        vec![(1, "draft".to_string()), (2, "published".to_string())]
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_starts_as_draft(pool: PgPool) {
    let script = ScriptRepo::create(&pool, &new_script("Banner", None))
        .await
        .unwrap();

    assert_eq!(script.name, "Banner");
    assert_eq!(script.state, "draft");
    assert!(script.public_id.is_none());
    assert!(script.published_at.is_none());
    assert_eq!(script.created_at, script.updated_at);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_blank_name_is_rejected_by_check(pool: PgPool) {
    let result = ScriptRepo::create(&pool, &new_script("   ", None)).await;
    assert!(result.is_err());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_applies_only_given_fields(pool: PgPool) {
    let script = ScriptRepo::create(&pool, &new_script("Banner", Some("hero")))
        .await
        .unwrap();

    let update = UpdateScript {
        code: Some("alert(1);".to_string()),
        ..Default::default()
    };
    let updated = ScriptRepo::update(&pool, script.id, &update)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.name, "Banner");
    assert_eq!(updated.description.as_deref(), Some("hero"));
    assert_eq!(updated.code, "alert(1);");
    assert!(updated.updated_at >= script.updated_at);

    let missing = ScriptRepo::update(&pool, script.id + 1000, &update)
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_publish_unpublish_republish_keeps_public_id(pool: PgPool) {
    let script = ScriptRepo::create(&pool, &new_script("Banner", None))
        .await
        .unwrap();

    let published = ScriptRepo::publish(&pool, script.id, "abcDEF2345")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(published.state, "published");
    assert_eq!(published.public_id.as_deref(), Some("abcDEF2345"));
    assert!(published.published_at.is_some());

    let draft = ScriptRepo::unpublish(&pool, script.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(draft.state, "draft");
    assert_eq!(draft.public_id.as_deref(), Some("abcDEF2345"));
    assert!(ScriptRepo::find_published_by_public_id(&pool, "abcDEF2345")
        .await
        .unwrap()
        .is_none());

    let republished = ScriptRepo::publish(&pool, script.id, "zzzzzzzzzz")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(republished.public_id.as_deref(), Some("abcDEF2345"));

    let served = ScriptRepo::find_published_by_public_id(&pool, "abcDEF2345")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(served.id, script.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_publish_collision_is_unique_violation(pool: PgPool) {
    let a = ScriptRepo::create(&pool, &new_script("A", None)).await.unwrap();
    let b = ScriptRepo::create(&pool, &new_script("B", None)).await.unwrap();
    ScriptRepo::publish(&pool, a.id, "sameID2345").await.unwrap();

    let err = StoreError::from(
        ScriptRepo::publish(&pool, b.id, "sameID2345")
            .await
            .unwrap_err(),
    );
    assert!(err.is_public_id_collision());

    let b = ScriptRepo::find_by_id(&pool, b.id).await.unwrap().unwrap();
    assert_eq!(b.state, "draft");
    assert!(b.public_id.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_search_filters_and_paginates(pool: PgPool) {
    for i in 0..11 {
        ScriptRepo::create(&pool, &new_script(&format!("Banner {i}"), None))
            .await
            .unwrap();
    }
    ScriptRepo::create(&pool, &new_script("Tracker", Some("pixel for BANNER ads")))
        .await
        .unwrap();
    ScriptRepo::create(&pool, &new_script("Popup", None))
        .await
        .unwrap();

    let query = ScriptQuery {
        search: "banner".to_string(),
        page: PageRequest::new(Some(2), Some(9)),
    };
    let (scripts, total) = ScriptRepo::search(&pool, &query).await.unwrap();
    assert_eq!(total, 12);
    assert_eq!(scripts.len(), 3);

    let everything = ScriptQuery::default();
    let (scripts, total) = ScriptRepo::search(&pool, &everything).await.unwrap();
    assert_eq!(total, 13);
    assert_eq!(scripts.len(), 9);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_search_treats_wildcards_literally(pool: PgPool) {
    ScriptRepo::create(&pool, &new_script("50% off", None))
        .await
        .unwrap();
    ScriptRepo::create(&pool, &new_script("500 off", None))
        .await
        .unwrap();

    let query = ScriptQuery {
        search: "50%".to_string(),
        page: PageRequest::default(),
    };
    let (scripts, total) = ScriptRepo::search(&pool, &query).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(scripts[0].name, "50% off");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete(pool: PgPool) {
    let script = ScriptRepo::create(&pool, &new_script("Banner", None))
        .await
        .unwrap();

    assert!(ScriptRepo::delete(&pool, script.id).await.unwrap());
    assert!(!ScriptRepo::delete(&pool, script.id).await.unwrap());
    assert_matches!(ScriptRepo::find_by_id(&pool, script.id).await, Ok(None));
}
