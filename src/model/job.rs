use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::meta::{Document, ObjectMeta, ResourceKind};

/// Lifecycle stage of a check job.
///
/// The phase token is owned by whoever submits the job, so any string decodes:
/// an empty one is [`JobPhase::Unset`] and unrecognized ones are kept verbatim
/// in [`JobPhase::Other`]. Any phase may replace any other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobPhase {
    #[default]
    Unset,
    Running,
    Completed,
    Failed,
    Suspended,
    Other(String),
}

impl JobPhase {
    pub fn as_str(&self) -> &str {
        match self {
            JobPhase::Unset => "",
            JobPhase::Running => "Running",
            JobPhase::Completed => "Completed",
            JobPhase::Failed => "Failed",
            JobPhase::Suspended => "Suspended",
            JobPhase::Other(token) => token,
        }
    }
}

impl From<String> for JobPhase {
    fn from(token: String) -> Self {
        match token.as_str() {
            "" => JobPhase::Unset,
            "Running" => JobPhase::Running,
            "Completed" => JobPhase::Completed,
            "Failed" => JobPhase::Failed,
            "Suspended" => JobPhase::Suspended,
            _ => JobPhase::Other(token),
        }
    }
}

impl From<JobPhase> for String {
    fn from(phase: JobPhase) -> Self {
        match phase {
            JobPhase::Other(token) => token,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job payload. Only `phase` is interpreted; the rest is kept as submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    #[serde(default)]
    pub phase: JobPhase,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A one-shot check job, created by whoever submits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckJob {
    pub metadata: ObjectMeta,
    pub spec: JobSpec,
    /// Top-level fields this crate does not interpret, such as `status`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CheckJob {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, spec: JobSpec) -> Self {
        Self {
            metadata: ObjectMeta::new(name, namespace),
            spec,
            extra: Map::new(),
        }
    }
}

impl Document for CheckJob {
    const KIND: ResourceKind = ResourceKind::CheckJob;

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}
