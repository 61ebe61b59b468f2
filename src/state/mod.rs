//! Reading and writing check state and job phases through a [`Repository`].
//!
//! [`StateStore`] owns its repository and the identity of this process; there
//! is no other shared state. Writers never take locks: every update carries
//! the resource version it was derived from and the store rejects it with a
//! conflict if someone else wrote first. Conflicts are returned to the caller,
//! who decides whether to re-fetch and try again.

mod phase;
mod reader;
mod writer;

use tracing::{debug, info};

use crate::error::StoreError;
use crate::model::{CheckState, WorkloadDetails, WorkloadKind, sanitize_resource_name};
use crate::store::Repository;

pub struct StateStore<R> {
    repo: R,
    pod_name: String,
}

impl<R: Repository> StateStore<R> {
    /// `pod_name` is stamped as the authoritative pod on every state write.
    pub fn new(repo: R, pod_name: impl Into<String>) -> Self {
        Self {
            repo,
            pod_name: pod_name.into(),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn pod_name(&self) -> &str {
        &self.pod_name
    }

    /// Creates an empty state document for `name` unless one already exists.
    ///
    /// Losing a creation race to another writer counts as success: the only
    /// promise is that the document exists afterwards.
    pub async fn ensure_exists(
        &self,
        name: &str,
        namespace: &str,
        workload: WorkloadKind,
    ) -> Result<(), StoreError> {
        let name = sanitize_resource_name(name);

        debug!(%namespace, %name, "checking existence of state resource");
        match self.repo.get::<CheckState>(&name, namespace).await {
            Ok(_) => {
                debug!(%namespace, %name, "state resource found");
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                info!(%namespace, %name, %workload, "state resource not found, creating it");
                let initial = CheckState::new(&name, namespace, WorkloadDetails::new(workload));
                match self.repo.create(&initial, namespace).await {
                    Ok(_) => Ok(()),
                    Err(err) if err.is_already_exists() => {
                        debug!(%namespace, %name, "state resource created concurrently");
                        Ok(())
                    }
                    Err(err) => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }
}
