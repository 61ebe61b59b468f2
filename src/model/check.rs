use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::meta::{Document, ObjectMeta, ResourceKind};

/// Whether a state document belongs to a recurring check or a one-shot job.
///
/// Written as `check` / `job`; the `KuberhealthyCheck` / `KuberhealthyJob`
/// tokens of older state documents are still read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadKind {
    #[default]
    #[serde(alias = "KuberhealthyCheck")]
    Check,
    #[serde(alias = "KuberhealthyJob")]
    Job,
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkloadKind::Check => write!(f, "check"),
            WorkloadKind::Job => write!(f, "job"),
        }
    }
}

/// The result payload of a check or job run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadDetails {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub run_duration: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub last_run: Option<DateTime<Utc>>,
    /// Pod that last wrote this state.
    #[serde(default)]
    pub authoritative_pod: String,
    /// Identifier of the run currently in flight.
    #[serde(default, rename = "currentUUID")]
    pub current_uuid: String,
    #[serde(default)]
    pub workload: WorkloadKind,
}

impl WorkloadDetails {
    /// Empty state for a workload that has never reported: not ok, no errors.
    pub fn new(workload: WorkloadKind) -> Self {
        Self {
            workload,
            ..Default::default()
        }
    }

    /// A check result with the given outcome.
    pub fn check_result(ok: bool, errors: Vec<String>) -> Self {
        Self {
            ok,
            errors,
            ..Self::new(WorkloadKind::Check)
        }
    }
}

/// State document for one check or job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckState {
    pub metadata: ObjectMeta,
    pub spec: WorkloadDetails,
    /// Top-level fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CheckState {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, spec: WorkloadDetails) -> Self {
        Self {
            metadata: ObjectMeta::new(name, namespace),
            spec,
            extra: Map::new(),
        }
    }
}

impl Document for CheckState {
    const KIND: ResourceKind = ResourceKind::CheckState;

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}
