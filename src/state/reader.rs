use tracing::debug;

use super::StateStore;
use crate::error::StateError;
use crate::model::{CheckState, WorkloadDetails, WorkloadKind, sanitize_resource_name};
use crate::store::Repository;

impl<R: Repository> StateStore<R> {
    /// Current state of a recurring check, creating an empty one on first sight.
    pub async fn get_check_state(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<WorkloadDetails, StateError> {
        self.read_state(name, namespace, WorkloadKind::Check).await
    }

    /// Current state of a job run, creating an empty one on first sight.
    pub async fn get_job_state(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<WorkloadDetails, StateError> {
        self.read_state(name, namespace, WorkloadKind::Job).await
    }

    /// Ensures the state document exists, then fetches it.
    pub async fn read_state(
        &self,
        name: &str,
        namespace: &str,
        workload: WorkloadKind,
    ) -> Result<WorkloadDetails, StateError> {
        let id = sanitize_resource_name(name);

        self.ensure_exists(name, namespace, workload)
            .await
            .map_err(|source| StateError::ExistenceCheckFailed {
                name: id.clone(),
                namespace: namespace.to_string(),
                source,
            })?;

        debug!(%namespace, name = %id, "retrieving state resource");
        let state: CheckState = self
            .repo
            .get(&id, namespace)
            .await
            .map_err(|source| StateError::FetchFailed {
                name: id.clone(),
                namespace: namespace.to_string(),
                source,
            })?;
        debug!(%namespace, name = %id, "retrieved state resource");

        Ok(state.spec)
    }
}
