// Ledger invariants under random operation sequences

mod common;

use common::{who, Harness, ESCROW, GENESIS_SUPPLY, OWNER};
use jobescrow_core::application::CreateJobRequest;
use jobescrow_core::domain::{JobId, JobStatus};
use jobescrow_core::port::JobRepository;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ACCOUNTS: [&str; 4] = [OWNER, "alice", "bob", "carol"];
const STEPS: usize = 200;

async fn total_supply(h: &Harness) -> u64 {
    let mut total = h.balance(ESCROW).await;
    for account in ACCOUNTS {
        total += h.balance(account).await;
    }
    total
}

async fn snapshot(h: &Harness) -> Vec<u64> {
    let mut balances = vec![h.balance(ESCROW).await];
    for account in ACCOUNTS {
        balances.push(h.balance(account).await);
    }
    balances
}

/// Random operations from random callers; every rejection leaves balances
/// unchanged and escrow always matches the outstanding bounties
async fn run_sequence(seed: u64) {
    let h = Harness::in_memory().await;
    let mut rng = StdRng::seed_from_u64(seed);

    // Spread the supply so every account can post jobs
    for account in &ACCOUNTS[1..] {
        h.fund(account, 100).await;
    }
    let supply = total_supply(&h).await;
    assert_eq!(supply, GENESIS_SUPPLY + 300);

    for account in ACCOUNTS {
        h.approve(account, 500).await;
    }

    let mut accepted = 0;
    for step in 0..STEPS {
        let caller = who(ACCOUNTS[rng.gen_range(0..ACCOUNTS.len())]);
        let job_count = h.repo.job_count().await.unwrap();
        let id: JobId = rng.gen_range(1..=job_count + 1);
        let before = snapshot(&h).await;

        let outcome = match rng.gen_range(0..5) {
            0 => {
                let amount = rng.gen_range(1..=40);
                h.registry
                    .create_job(&caller, CreateJobRequest::new(format!("job-{step}"), amount))
                    .await
            }
            1 => h.registry.delete_job(&caller, id).await,
            2 => h.registry.assign_job(&caller, id).await,
            3 => h.registry.mark_job_complete(&caller, id).await,
            _ => h.registry.accept_job(&caller, id).await,
        };

        match outcome {
            Ok(event) => {
                assert_eq!(h.job(event.job_id()).await.status, event.resulting_status());
                if event.resulting_status() == JobStatus::Accepted {
                    accepted += 1;
                }
            }
            Err(_) => assert_eq!(snapshot(&h).await, before, "seed {seed} step {step}"),
        }

        h.audit().await;
        assert_eq!(total_supply(&h).await, supply, "seed {seed} step {step}");
    }

    assert_eq!(
        h.repo.count_by_status(JobStatus::Accepted).await.unwrap(),
        accepted
    );
    println!("✅ seed {seed}: {STEPS} steps, {accepted} accepted");
}

#[tokio::test]
async fn test_random_sequences_preserve_escrow() {
    for seed in [1, 7, 42, 1337] {
        run_sequence(seed).await;
    }
}

/// Jobs never leave a terminal status
#[tokio::test]
async fn test_terminal_jobs_stay_terminal() {
    let h = Harness::in_memory().await;
    h.approve(OWNER, 10).await;
    h.registry
        .create_job(&who(OWNER), CreateJobRequest::new("a", 2))
        .await
        .unwrap();
    h.registry.delete_job(&who(OWNER), 1).await.unwrap();

    assert!(h.registry.delete_job(&who(OWNER), 1).await.is_err());
    assert!(h.registry.assign_job(&who("alice"), 1).await.is_err());
    assert!(h.registry.mark_job_complete(&who("alice"), 1).await.is_err());
    assert!(h.registry.accept_job(&who(OWNER), 1).await.is_err());

    let job = h.job(1).await;
    assert_eq!(job.status, JobStatus::Deleted);
    assert_eq!(job.freelancer, None);
    assert_eq!(h.balance(OWNER).await, GENESIS_SUPPLY);
    h.audit().await;
}
