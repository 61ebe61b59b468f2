//! End-to-end behaviour of the state layer against the in-memory store.

use checkstate::store::MemoryRepository;
use checkstate::{
    CheckJob, CheckState, Document, JobPhase, JobSpec, Repository, StateStore, WorkloadDetails,
    WorkloadKind,
};
use futures_util::future::join_all;
use serde_json::json;

fn store(pod: &str) -> StateStore<MemoryRepository> {
    StateStore::new(MemoryRepository::new(), pod)
}

#[tokio::test]
async fn check_state_is_created_on_first_read_then_updated() {
    let store = store("checker-0");

    let initial = store.get_check_state("db-ping", "ops").await.unwrap();
    assert!(!initial.ok);
    assert!(initial.errors.is_empty());

    store
        .set_check_state("db-ping", "ops", WorkloadDetails::check_result(true, Vec::new()))
        .await
        .unwrap();

    let current = store.get_check_state("db-ping", "ops").await.unwrap();
    assert!(current.ok);
    assert!(current.errors.is_empty());
    assert_eq!(current.authoritative_pod, "checker-0");
    assert!(current.last_run.is_some());
}

#[tokio::test]
async fn unsanitized_names_address_the_same_document() {
    let store = store("checker-0");
    store
        .ensure_exists("DB Ping", "ops", WorkloadKind::Check)
        .await
        .unwrap();
    store
        .set_check_state(
            "db ping",
            "ops",
            WorkloadDetails::check_result(false, vec!["refused".into()]),
        )
        .await
        .unwrap();

    let state = store.get_check_state("DB PING", "ops").await.unwrap();
    assert_eq!(state.errors, vec!["refused".to_string()]);
    assert_eq!(store.repository().len(), 1);
}

#[tokio::test]
async fn concurrent_ensure_creates_exactly_one_document() {
    let store = store("checker-0");
    let results = join_all(
        (0..16).map(|_| store.ensure_exists("db-ping", "ops", WorkloadKind::Check)),
    )
    .await;

    assert_eq!(results.len(), 16);
    assert!(results.iter().all(Result::is_ok));
    assert_eq!(store.repository().len(), 1);
}

#[tokio::test]
async fn concurrent_first_reads_all_succeed() {
    let store = store("checker-0");
    let results = join_all((0..4).map(|_| store.get_check_state("db-ping", "ops"))).await;
    assert!(results.iter().all(Result::is_ok));
    assert_eq!(store.repository().len(), 1);
}

#[tokio::test]
async fn two_replicas_racing_on_one_check() {
    let repo = MemoryRepository::new();
    let a = StateStore::new(&repo, "checker-a");
    let b = StateStore::new(&repo, "checker-b");

    a.ensure_exists("db-ping", "ops", WorkloadKind::Check)
        .await
        .unwrap();

    let (ra, rb) = tokio::join!(
        a.set_check_state("db-ping", "ops", WorkloadDetails::check_result(true, Vec::new())),
        b.set_check_state(
            "db-ping",
            "ops",
            WorkloadDetails::check_result(false, vec!["from b".into()])
        ),
    );

    // Both read the same version, so exactly one write lands.
    assert!(ra.is_ok() != rb.is_ok());
    let loser = if ra.is_ok() { rb.unwrap_err() } else { ra.unwrap_err() };
    assert!(loser.is_conflict());

    let stored: CheckState = repo.get("db-ping", "ops").await.unwrap();
    let expected_pod = if stored.spec.ok { "checker-a" } else { "checker-b" };
    assert_eq!(stored.spec.authoritative_pod, expected_pod);
}

#[tokio::test]
async fn caller_can_refetch_and_retry_after_conflict() {
    let repo = MemoryRepository::new();
    let store = StateStore::new(&repo, "checker-0");
    store
        .ensure_exists("db-ping", "ops", WorkloadKind::Check)
        .await
        .unwrap();

    let stale: CheckState = repo.get("db-ping", "ops").await.unwrap();
    store
        .set_check_state("db-ping", "ops", WorkloadDetails::check_result(true, Vec::new()))
        .await
        .unwrap();
    assert!(repo.update(&stale, "ops").await.unwrap_err().is_conflict());

    let mut fresh: CheckState = repo.get("db-ping", "ops").await.unwrap();
    fresh.spec.errors.push("late error".into());
    let written = repo.update(&fresh, "ops").await.unwrap();
    assert_eq!(written.spec.errors, vec!["late error".to_string()]);
}

#[tokio::test]
async fn stale_job_writer_conflicts_and_winner_is_kept() {
    let repo = MemoryRepository::new();
    let spec: JobSpec = serde_json::from_value(json!({
        "phase": "Running",
        "timeout": "30m",
        "extraAnnotations": {"owner": "sre"}
    }))
    .unwrap();
    let v1 = repo
        .create(&CheckJob::new("nightly-job", "ops", spec), "ops")
        .await
        .unwrap();

    // Writer A transitions through the state layer.
    let store = StateStore::new(&repo, "checker-a");
    let v2 = store
        .set_job_phase("nightly-job", "ops", JobPhase::Completed)
        .await
        .unwrap();
    assert_ne!(v2.resource_version(), v1.resource_version());

    // Writer B still holds v1.
    let mut stale = v1.clone();
    stale.spec.phase = JobPhase::Failed;
    let err = repo.update(&stale, "ops").await.unwrap_err();
    assert!(err.is_conflict());

    let stored: CheckJob = repo.get("nightly-job", "ops").await.unwrap();
    assert_eq!(stored.spec.phase, JobPhase::Completed);
    assert_eq!(stored.resource_version(), v2.resource_version());
    assert_eq!(stored.spec.extra, v1.spec.extra);
}

#[tokio::test]
async fn job_state_and_job_phase_are_separate_documents() {
    let repo = MemoryRepository::new();
    repo.create(&CheckJob::new("nightly-job", "ops", JobSpec::default()), "ops")
        .await
        .unwrap();
    let store = StateStore::new(&repo, "checker-0");

    let state = store.get_job_state("nightly-job", "ops").await.unwrap();
    assert_eq!(state.workload, WorkloadKind::Job);
    store
        .set_job_phase("nightly-job", "ops", JobPhase::Suspended)
        .await
        .unwrap();

    assert_eq!(repo.len(), 2);
    let job: CheckJob = repo.get("nightly-job", "ops").await.unwrap();
    assert_eq!(job.spec.phase, JobPhase::Suspended);
}

#[tokio::test]
async fn failures_on_one_key_leave_others_untouched() {
    let store = store("checker-0");
    store.get_check_state("db-ping", "ops").await.unwrap();
    store
        .set_check_state("db-ping", "ops", WorkloadDetails::check_result(true, Vec::new()))
        .await
        .unwrap();

    assert!(
        store
            .set_check_state("dns-check", "ops", WorkloadDetails::check_result(false, Vec::new()))
            .await
            .is_err()
    );
    assert!(
        store
            .set_job_phase("missing-job", "ops", JobPhase::Failed)
            .await
            .is_err()
    );

    let state = store.get_check_state("db-ping", "ops").await.unwrap();
    assert!(state.ok);
    assert_eq!(store.repository().len(), 1);
}
