//! In-process store with the same optimistic-concurrency rules as the API server.
//!
//! Documents are kept serialized, so what comes back out is exactly what a
//! remote round-trip would return. Resource versions come from one counter
//! shared by every key and are rendered as decimal strings. Every call yields
//! to the scheduler once before touching the map, the way a network call
//! would, so concurrent callers actually interleave.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde_json::Value;
use uuid::Uuid;

use super::Repository;
use crate::error::StoreError;
use crate::model::{Document, ResourceKey};

struct StoredObject {
    version: u64,
    uid: String,
    body: Value,
}

#[derive(Default)]
struct Inner {
    objects: HashMap<ResourceKey, StoredObject>,
    last_version: u64,
}

impl Inner {
    fn next_version(&mut self) -> u64 {
        self.last_version += 1;
        self.last_version
    }
}

#[derive(Default)]
pub struct MemoryRepository {
    inner: Mutex<Inner>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents across all kinds and namespaces.
    pub fn len(&self) -> usize {
        self.inner.lock().objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn encode<D: Document>(document: &D, key: &ResourceKey) -> Result<Value, StoreError> {
    serde_json::to_value(document).map_err(|e| StoreError::Codec {
        key: key.clone(),
        message: e.to_string(),
    })
}

fn decode<D: Document>(body: Value, key: &ResourceKey) -> Result<D, StoreError> {
    serde_json::from_value(body).map_err(|e| StoreError::Codec {
        key: key.clone(),
        message: e.to_string(),
    })
}

/// Stamps store-owned metadata onto a document before it is persisted.
fn assign_metadata<D: Document>(
    document: &D,
    namespace: &str,
    version: u64,
    uid: &str,
) -> D {
    let mut stored = document.clone();
    let meta = stored.metadata_mut();
    meta.namespace = namespace.to_string();
    meta.resource_version = Some(version.to_string());
    meta.uid = Some(uid.to_string());
    stored
}

impl Repository for MemoryRepository {
    async fn get<D: Document>(&self, name: &str, namespace: &str) -> Result<D, StoreError> {
        tokio::task::yield_now().await;
        let key = ResourceKey::new(D::KIND, name, namespace);
        let body = {
            let inner = self.inner.lock();
            match inner.objects.get(&key) {
                Some(object) => object.body.clone(),
                None => return Err(StoreError::NotFound { key }),
            }
        };
        decode(body, &key)
    }

    async fn create<D: Document>(&self, document: &D, namespace: &str) -> Result<D, StoreError> {
        tokio::task::yield_now().await;
        let key = document.key_in(namespace);
        if document.resource_version().is_some() {
            return Err(StoreError::Api {
                key,
                status: 400,
                message: "resourceVersion should not be set on objects to be created".into(),
            });
        }
        let mut inner = self.inner.lock();
        if inner.objects.contains_key(&key) {
            return Err(StoreError::AlreadyExists { key });
        }

        let version = inner.next_version();
        let uid = Uuid::new_v4().to_string();
        let stored = assign_metadata(document, namespace, version, &uid);
        let body = encode(&stored, &key)?;
        inner.objects.insert(key, StoredObject { version, uid, body });
        Ok(stored)
    }

    async fn update<D: Document>(&self, document: &D, namespace: &str) -> Result<D, StoreError> {
        tokio::task::yield_now().await;
        let key = document.key_in(namespace);
        let mut inner = self.inner.lock();
        let (current, uid) = match inner.objects.get(&key) {
            Some(object) => (object.version, object.uid.clone()),
            None => return Err(StoreError::NotFound { key }),
        };

        let carried = document.resource_version();
        if carried != Some(current.to_string().as_str()) {
            return Err(StoreError::Conflict { key });
        }

        let version = inner.next_version();
        let stored = assign_metadata(document, namespace, version, &uid);
        let body = encode(&stored, &key)?;
        inner.objects.insert(key, StoredObject { version, uid, body });
        Ok(stored)
    }
}
