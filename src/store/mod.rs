//! The contract over the remote versioned document store.
//!
//! [`Repository`] is the only seam that touches the store. Everything above it
//! is plain logic, so tests run against [`MemoryRepository`] and production
//! talks to the API server through [`HttpRepository`].

pub mod http;
pub mod memory;

pub use http::HttpRepository;
pub use memory::MemoryRepository;

use crate::error::StoreError;
use crate::model::Document;

/// Get / create / compare-and-swap update of versioned documents, keyed by
/// (kind, name, namespace).
#[allow(async_fn_in_trait)]
pub trait Repository {
    /// Fetch a document. Fails with [`StoreError::NotFound`] if absent.
    async fn get<D: Document>(&self, name: &str, namespace: &str) -> Result<D, StoreError>;

    /// Store a new document and return it with its assigned version.
    /// Fails with [`StoreError::AlreadyExists`] if the key is taken.
    async fn create<D: Document>(&self, document: &D, namespace: &str) -> Result<D, StoreError>;

    /// Replace a document only if its carried resource version is the one
    /// currently stored, otherwise fail with [`StoreError::Conflict`].
    /// Returns the document with its new version.
    async fn update<D: Document>(&self, document: &D, namespace: &str) -> Result<D, StoreError>;
}

impl<R: Repository> Repository for &R {
    async fn get<D: Document>(&self, name: &str, namespace: &str) -> Result<D, StoreError> {
        (**self).get(name, namespace).await
    }

    async fn create<D: Document>(&self, document: &D, namespace: &str) -> Result<D, StoreError> {
        (**self).create(document, namespace).await
    }

    async fn update<D: Document>(&self, document: &D, namespace: &str) -> Result<D, StoreError> {
        (**self).update(document, namespace).await
    }
}
