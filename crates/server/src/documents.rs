//! In-memory JSON document store: named collections of key -> document, kept in
//! insertion order.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use serde_json::{Map, Value};
use shared::error::ApiException;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct DocumentStore {
    collections: Arc<RwLock<HashMap<String, Vec<(String, Value)>>>>,
    next_seq: Arc<AtomicU64>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whole collection as one JSON object, or `null` when it holds nothing.
    pub async fn list(&self, collection: &str) -> Value {
        let guard = self.collections.read().await;
        match guard.get(collection) {
            Some(entries) if !entries.is_empty() => Value::Object(
                entries
                    .iter()
                    .map(|(key, document)| (key.clone(), document.clone()))
                    .collect::<Map<String, Value>>(),
            ),
            _ => Value::Null,
        }
    }

    /// Stores `document` under a freshly generated key and returns the key.
    pub async fn push(&self, collection: &str, document: Value) -> Result<String, ApiException> {
        if document.is_null() {
            return Err(ApiException::invalid_document(
                "cannot store a null document",
            ));
        }

        let key = self.next_key();
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push((key.clone(), document));
        Ok(key)
    }

    /// Loads a seed object shaped `{collection: {key: document}}`, keeping keys as given.
    pub async fn seed(&self, seed: Value) -> Result<usize, ApiException> {
        let Value::Object(collections) = seed else {
            return Err(ApiException::invalid_document(
                "seed must be an object of collections",
            ));
        };

        let mut guard = self.collections.write().await;
        let mut loaded = 0;
        for (collection, documents) in collections {
            let Value::Object(documents) = documents else {
                return Err(ApiException::invalid_document(format!(
                    "seed collection '{collection}' must be an object"
                )));
            };
            let entries = guard.entry(collection).or_default();
            for (key, document) in documents {
                entries.push((key, document));
                loaded += 1;
            }
        }
        Ok(loaded)
    }

    // Zero-padded sequence first so keys sort in creation order.
    fn next_key(&self) -> String {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let suffix = Uuid::new_v4().simple().to_string();
        format!("-{seq:012}{}", &suffix[..8])
    }
}

#[cfg(test)]
#[path = "tests/documents_tests.rs"]
mod tests;
