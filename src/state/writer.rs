use chrono::Utc;
use tracing::{debug, warn};

use super::StateStore;
use crate::error::StoreError;
use crate::model::{CheckState, WorkloadDetails, sanitize_resource_name};
use crate::store::Repository;

impl<R: Repository> StateStore<R> {
    /// Replaces a check's state with `details`, stamped with this pod and the
    /// current time.
    ///
    /// The document must already exist (see [`StateStore::ensure_exists`]).
    /// The write carries the version fetched here, so if another writer got in
    /// between, this fails with [`StoreError::Conflict`] and nothing is written.
    pub async fn set_check_state(
        &self,
        name: &str,
        namespace: &str,
        mut details: WorkloadDetails,
    ) -> Result<CheckState, StoreError> {
        let name = sanitize_resource_name(name);

        // the current resource version comes from the stored document
        let mut state: CheckState = self.repo.get(&name, namespace).await?;

        details.authoritative_pod = self.pod_name.clone();
        details.last_run = Some(Utc::now());
        state.spec = details;

        debug!(
            %namespace,
            %name,
            ok = state.spec.ok,
            errors = ?state.spec.errors,
            last_run = ?state.spec.last_run,
            "writing check state"
        );
        self.repo.update(&state, namespace).await.inspect_err(|err| {
            if err.is_conflict() {
                warn!(%namespace, %name, "check state changed since it was read");
            }
        })
    }
}
