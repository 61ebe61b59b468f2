mod check;
mod job;
mod meta;
mod sanitize;

pub use check::{CheckState, WorkloadDetails, WorkloadKind};
pub use job::{CheckJob, JobPhase, JobSpec};
pub use meta::{Document, ObjectMeta, ResourceKey, ResourceKind};
pub use sanitize::sanitize_resource_name;
