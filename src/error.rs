//! Error types for the state repository and the components built on it.
//!
//! [`StoreError`] is what a [`Repository`](crate::store::Repository) returns;
//! every variant carries the [`ResourceKey`] it was raised for. [`StateError`]
//! wraps store failures on the read path so callers can tell an existence
//! check failure apart from a fetch failure.

use thiserror::Error;

use crate::model::ResourceKey;

/// Failures raised by a [`Repository`](crate::store::Repository).
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document is stored under the key.
    #[error("{key} not found")]
    NotFound { key: ResourceKey },

    /// A create raced with another writer, or the document was already there.
    #[error("{key} already exists")]
    AlreadyExists { key: ResourceKey },

    /// The carried resource version does not match the stored one.
    #[error("conflict updating {key}: the object has been modified, re-fetch and try again")]
    Conflict { key: ResourceKey },

    /// The request never produced a response (DNS, refused connection, timeout).
    #[error("transport error for {key}: {source}")]
    Transport {
        key: ResourceKey,
        #[source]
        source: reqwest::Error,
    },

    /// The store answered with an unexpected status.
    #[error("store returned status {status} for {key}: {message}")]
    Api {
        key: ResourceKey,
        status: u16,
        message: String,
    },

    /// A document could not be encoded or decoded.
    #[error("codec error for {key}: {message}")]
    Codec { key: ResourceKey, message: String },
}

impl StoreError {
    /// The key the failing operation addressed.
    pub fn key(&self) -> &ResourceKey {
        match self {
            StoreError::NotFound { key }
            | StoreError::AlreadyExists { key }
            | StoreError::Conflict { key }
            | StoreError::Transport { key, .. }
            | StoreError::Api { key, .. }
            | StoreError::Codec { key, .. } => key,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists { .. })
    }

    /// A conflict means another writer won; re-fetching and reapplying may succeed.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

/// Failures on the ensure-then-fetch read path.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("error validating state resource exists: {namespace}/{name}: {source}")]
    ExistenceCheckFailed {
        name: String,
        namespace: String,
        #[source]
        source: StoreError,
    },

    #[error("error retrieving state resource: {namespace}/{name}: {source}")]
    FetchFailed {
        name: String,
        namespace: String,
        #[source]
        source: StoreError,
    },
}

impl StateError {
    /// The underlying store failure.
    pub fn store_error(&self) -> &StoreError {
        match self {
            StateError::ExistenceCheckFailed { source, .. }
            | StateError::FetchFailed { source, .. } => source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.store_error().is_not_found()
    }

    pub fn is_conflict(&self) -> bool {
        self.store_error().is_conflict()
    }
}
