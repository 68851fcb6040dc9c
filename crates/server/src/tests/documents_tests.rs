use super::*;
use serde_json::json;

#[tokio::test]
async fn empty_collection_lists_as_null() {
    let store = DocumentStore::new();
    assert_eq!(store.list("movies").await, Value::Null);
}

#[tokio::test]
async fn pushed_documents_list_in_insertion_order() {
    let store = DocumentStore::new();
    let first = store
        .push("movies", json!({ "title": "First" }))
        .await
        .expect("push");
    let second = store
        .push("movies", json!({ "title": "Second" }))
        .await
        .expect("push");
    assert!(first < second, "{first} should sort before {second}");

    let listed = store.list("movies").await;
    let keys: Vec<&String> = listed.as_object().expect("object").keys().collect();
    assert_eq!(keys, vec![&first, &second]);
    assert_eq!(listed[&second]["title"], "Second");
}

#[tokio::test]
async fn collections_are_independent() {
    let store = DocumentStore::new();
    store
        .push("movies", json!({ "title": "Only movie" }))
        .await
        .expect("push");
    assert_eq!(store.list("books").await, Value::Null);
}

#[tokio::test]
async fn null_documents_are_rejected() {
    let store = DocumentStore::new();
    let err = store
        .push("movies", Value::Null)
        .await
        .expect_err("must fail");
    assert_eq!(err.code, shared::error::ErrorCode::Validation);
}

#[tokio::test]
async fn seed_keeps_given_keys_and_order() {
    let store = DocumentStore::new();
    let loaded = store
        .seed(json!({
            "movies": {
                "-z": { "title": "Zulu" },
                "-a": { "title": "Alpha" }
            }
        }))
        .await
        .expect("seed");
    assert_eq!(loaded, 2);

    let listed = store.list("movies").await;
    let keys: Vec<&str> = listed
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["-z", "-a"]);
}

#[tokio::test]
async fn seed_rejects_non_object_collections() {
    let store = DocumentStore::new();
    let err = store
        .seed(json!({ "movies": [1, 2, 3] }))
        .await
        .expect_err("must fail");
    assert!(err.message.contains("movies"));
}
