//! Behavior of the in-memory store through the `ScriptStore` trait.

use std::sync::Arc;

use abinject_core::pagination::PageRequest;
use abinject_db::models::script::{CreateScript, ScriptQuery, UpdateScript};
use abinject_db::store::{MemoryScriptStore, ScriptStore};

fn new_script(name: &str, description: Option<&str>) -> CreateScript {
    CreateScript {
        name: name.to_string(),
        description: description.map(str::to_string),
        code: String::new(),
    }
}

fn store() -> Arc<dyn ScriptStore> {
    Arc::new(MemoryScriptStore::new())
}

#[tokio::test]
async fn list_is_ordered_by_last_modification() {
    let store = store();
    let first = store.create(&new_script("first", None)).await.unwrap();
    let second = store.create(&new_script("second", None)).await.unwrap();

    let names: Vec<String> = store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, ["second", "first"]);

    let update = UpdateScript {
        description: Some("touched".to_string()),
        ..Default::default()
    };
    store.update(first.id, &update).await.unwrap();

    let ids: Vec<i64> = store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, [first.id, second.id]);
}

#[tokio::test]
async fn search_matches_name_or_description_case_insensitively() {
    let store = store();
    store
        .create(&new_script("Banner Promo", None))
        .await
        .unwrap();
    store
        .create(&new_script("Tracker", Some("loads the banner pixel")))
        .await
        .unwrap();
    store.create(&new_script("Popup", None)).await.unwrap();

    let query = ScriptQuery {
        search: "BANNER".to_string(),
        page: PageRequest::default(),
    };
    let page = store.search(&query).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.total_pages, 1);
    assert!(page.scripts.iter().all(|s| s.name != "Popup"));
}

#[tokio::test]
async fn second_page_of_eleven_has_two_scripts() {
    let store = store();
    for i in 0..11 {
        store
            .create(&new_script(&format!("script {i}"), None))
            .await
            .unwrap();
    }

    let query = ScriptQuery {
        search: String::new(),
        page: PageRequest::new(Some(2), Some(9)),
    };
    let page = store.search(&query).await.unwrap();
    assert_eq!(page.total, 11);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.page, 2);
    assert_eq!(page.scripts.len(), 2);

    let beyond = ScriptQuery {
        search: String::new(),
        page: PageRequest::new(Some(5), Some(9)),
    };
    let page = store.search(&beyond).await.unwrap();
    assert!(page.scripts.is_empty());
    assert_eq!(page.total, 11);
}

#[tokio::test]
async fn only_published_scripts_are_found_by_public_id() {
    let store = store();
    let script = store.create(&new_script("Banner", None)).await.unwrap();
    assert!(store
        .find_published_by_public_id("abcDEF2345")
        .await
        .unwrap()
        .is_none());

    store.publish(script.id, "abcDEF2345").await.unwrap();
    let found = store
        .find_published_by_public_id("abcDEF2345")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, script.id);

    store.unpublish(script.id).await.unwrap();
    assert!(store
        .find_published_by_public_id("abcDEF2345")
        .await
        .unwrap()
        .is_none());

    store.publish(script.id, "otherID234").await.unwrap();
    store.delete(script.id).await.unwrap();
    assert!(store
        .find_published_by_public_id("abcDEF2345")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn unpublish_keeps_published_at() {
    let store = store();
    let script = store.create(&new_script("Banner", None)).await.unwrap();
    let published = store
        .publish(script.id, "abcDEF2345")
        .await
        .unwrap()
        .unwrap();
    let draft = store.unpublish(script.id).await.unwrap().unwrap();

    assert_eq!(draft.state, "draft");
    assert_eq!(draft.published_at, published.published_at);
    assert_eq!(draft.public_id, published.public_id);
}
