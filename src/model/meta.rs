use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The document types this crate persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Result state of a check or job run.
    CheckState,
    /// A submitted one-shot check job.
    CheckJob,
}

impl ResourceKind {
    /// The `kind` field sent to the store.
    pub fn kind(&self) -> &'static str {
        match self {
            ResourceKind::CheckState => "CheckState",
            ResourceKind::CheckJob => "CheckJob",
        }
    }

    /// The plural path segment used in store URLs.
    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::CheckState => "checkstates",
            ResourceKind::CheckJob => "checkjobs",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.plural())
    }
}

/// Address of one document in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    pub kind: ResourceKind,
    pub name: String,
    pub namespace: String,
}

impl ResourceKey {
    pub fn new(kind: ResourceKind, name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.namespace, self.name)
    }
}

/// Object metadata as the store reports it.
///
/// `resource_version` and `uid` are assigned by the store; a document built
/// locally has neither until it has been created. Labels, annotations,
/// finalizers and the rest are carried untouched in `extra` so a whole-document
/// update writes them back as read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ObjectMeta {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }
}

/// A versioned document that can be stored in a
/// [`Repository`](crate::store::Repository).
pub trait Document: Clone + Serialize + DeserializeOwned + Send + Sync {
    const KIND: ResourceKind;

    fn metadata(&self) -> &ObjectMeta;

    fn metadata_mut(&mut self) -> &mut ObjectMeta;

    fn name(&self) -> &str {
        &self.metadata().name
    }

    fn resource_version(&self) -> Option<&str> {
        self.metadata().resource_version.as_deref()
    }

    /// Key of this document within `namespace`.
    fn key_in(&self, namespace: &str) -> ResourceKey {
        ResourceKey::new(Self::KIND, self.name(), namespace)
    }
}
