use tracing::{error, info, warn};

use super::StateStore;
use crate::error::StoreError;
use crate::model::{CheckJob, JobPhase};
use crate::store::Repository;

impl<R: Repository> StateStore<R> {
    /// Sets a job's phase, leaving every other field as stored.
    ///
    /// Jobs are never created here; a missing job is [`StoreError::NotFound`].
    /// Any phase may follow any other. A concurrent write surfaces as
    /// [`StoreError::Conflict`].
    pub async fn set_job_phase(
        &self,
        name: &str,
        namespace: &str,
        phase: JobPhase,
    ) -> Result<CheckJob, StoreError> {
        let mut job: CheckJob = self.repo.get(name, namespace).await.inspect_err(|err| {
            error!(%namespace, %name, error = %err, "error getting check job");
        })?;

        let previous = std::mem::replace(&mut job.spec.phase, phase);
        info!(%namespace, %name, %previous, phase = %job.spec.phase, "setting check job phase");

        self.repo.update(&job, namespace).await.inspect_err(|err| {
            if err.is_conflict() {
                warn!(%namespace, %name, "check job changed since it was read");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::model::{CheckJob, Document, JobPhase, JobSpec};
    use crate::state::StateStore;
    use crate::store::{MemoryRepository, Repository};

    async fn submitted(store: &StateStore<MemoryRepository>) -> CheckJob {
        let spec: JobSpec = serde_json::from_value(json!({
            "phase": "Running",
            "timeout": "10m",
            "podSpec": {"containers": [{"name": "pinger", "image": "pinger:2"}]}
        }))
        .unwrap();
        store
            .repository()
            .create(&CheckJob::new("nightly-job", "ops", spec), "ops")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn only_phase_changes() {
        let store = StateStore::new(MemoryRepository::new(), "checker-0");
        let before = submitted(&store).await;

        let after = store
            .set_job_phase("nightly-job", "ops", JobPhase::Completed)
            .await
            .unwrap();

        assert_eq!(after.spec.phase, JobPhase::Completed);
        assert_eq!(after.spec.extra, before.spec.extra);
        assert_eq!(after.metadata.name, before.metadata.name);
        assert_eq!(after.metadata.uid, before.metadata.uid);
        assert_ne!(after.resource_version(), before.resource_version());
    }

    #[tokio::test]
    async fn missing_job_is_not_created() {
        let store = StateStore::new(MemoryRepository::new(), "checker-0");
        let err = store
            .set_job_phase("nightly-job", "ops", JobPhase::Running)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(store.repository().is_empty());
    }

    #[tokio::test]
    async fn terminal_phase_can_be_overwritten() {
        let store = StateStore::new(MemoryRepository::new(), "checker-0");
        submitted(&store).await;

        store
            .set_job_phase("nightly-job", "ops", JobPhase::Completed)
            .await
            .unwrap();
        let job = store
            .set_job_phase("nightly-job", "ops", JobPhase::Running)
            .await
            .unwrap();
        assert_eq!(job.spec.phase, JobPhase::Running);
    }

    #[tokio::test]
    async fn unset_phase_can_be_started() {
        let store = StateStore::new(MemoryRepository::new(), "checker-0");
        store
            .repository()
            .create(&CheckJob::new("nightly-job", "ops", JobSpec::default()), "ops")
            .await
            .unwrap();

        let job = store
            .set_job_phase("nightly-job", "ops", JobPhase::Running)
            .await
            .unwrap();
        assert_eq!(job.spec.phase, JobPhase::Running);
    }
}
