// Concurrent callers against one registry (and two registries over one file)

mod common;

use std::sync::Arc;

use common::{addr, who, Harness, TempDb, ESCROW, GENESIS_SUPPLY, OWNER};
use futures::future::join_all;
use jobescrow_core::application::{CreateJobRequest, JobRegistry};
use jobescrow_core::domain::{DomainError, JobStatus};
use jobescrow_core::port::time_provider::SystemTimeProvider;
use jobescrow_core::port::JobRepository;
use jobescrow_infra_sqlite::SqliteJobRepository;

/// Ten freelancers race for one job: exactly one wins
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_assign_single_winner() {
    let h = Harness::in_memory().await;
    h.approve(OWNER, 10).await;
    h.registry
        .create_job(&who(OWNER), CreateJobRequest::new("Job1", 3))
        .await
        .unwrap();

    let attempts = (0..10).map(|i| {
        let registry = h.registry.clone();
        tokio::spawn(async move { registry.assign_job(&who(&format!("f{i}")), 1).await })
    });
    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(matches!(
            err.as_domain(),
            Some(DomainError::InvalidStateTransition { .. })
        ));
    }

    let job = h.job(1).await;
    assert_eq!(job.status, JobStatus::Assigned);
    assert!(job.freelancer.is_some());
    println!("✅ one assignment out of 10");
}

/// Concurrent creates get distinct, gap-free ids
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_sequential_ids() {
    let h = Harness::in_memory().await;
    h.approve(OWNER, 100).await;

    let creates = (0..20).map(|i| {
        let registry = h.registry.clone();
        tokio::spawn(async move {
            registry
                .create_job(&who(OWNER), CreateJobRequest::new(format!("job-{i}"), 2))
                .await
        })
    });
    let mut ids: Vec<u64> = join_all(creates)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap().job_id())
        .collect();
    ids.sort_unstable();

    assert_eq!(ids, (1..=20).collect::<Vec<u64>>());
    assert_eq!(h.repo.job_count().await.unwrap(), 20);
    assert_eq!(h.balance(ESCROW).await, 40);
    assert_eq!(h.balance(OWNER).await, GENESIS_SUPPLY - 40);
    h.audit().await;
    println!("✅ 20 concurrent creates");
}

/// Two registries sharing a database file still admit one winner
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_registries_one_database() {
    let db = TempDb::new("two-registries");
    let h = Harness::open(&db.url()).await;
    h.approve(OWNER, 10).await;
    h.registry
        .create_job(&who(OWNER), CreateJobRequest::new("Job1", 3))
        .await
        .unwrap();

    let other = Arc::new(JobRegistry::new(
        Arc::new(SqliteJobRepository::new(h.pool.clone())),
        Arc::new(SystemTimeProvider),
        addr(ESCROW),
    ));

    let attempts = (0..8).map(|i| {
        let registry = if i % 2 == 0 {
            h.registry.clone()
        } else {
            other.clone()
        };
        tokio::spawn(async move { registry.assign_job(&who(&format!("f{i}")), 1).await })
    });
    let winners = join_all(attempts)
        .await
        .into_iter()
        .filter(|joined| matches!(joined, Ok(Ok(_))))
        .count();

    assert_eq!(winners, 1);
    assert_eq!(h.job(1).await.status, JobStatus::Assigned);
    h.pool.close().await;
    println!("✅ conditional update guards across registries");
}
