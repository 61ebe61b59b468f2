//! Durable state for distributed health checks.
//!
//! Check results and job phases are stored as versioned documents in a remote
//! store. Writers coordinate through the store's resource versions instead of
//! locks: an update only lands if it was derived from the version currently
//! stored.
//!
//! ```no_run
//! use checkstate::{StateStore, StoreConfig, WorkloadDetails};
//! use checkstate::store::HttpRepository;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = StoreConfig::load()?;
//! let store = StateStore::new(HttpRepository::new(&config)?, config.pod_name.clone());
//!
//! let current = store.get_check_state("DB Ping", "ops").await?;
//! if !current.ok {
//!     store
//!         .set_check_state("DB Ping", "ops", WorkloadDetails::check_result(true, Vec::new()))
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod state;
pub mod store;

pub use config::StoreConfig;
pub use error::{StateError, StoreError};
pub use model::{
    CheckJob, CheckState, Document, JobPhase, JobSpec, ObjectMeta, ResourceKey, ResourceKind,
    WorkloadDetails, WorkloadKind, sanitize_resource_name,
};
pub use state::StateStore;
pub use store::Repository;
