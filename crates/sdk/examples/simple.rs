//! Simple SDK Example
//!
//! Walks one job through its full lifecycle.
//!
//! # Usage
//!
//! 1. Start the daemon (fresh database, genesis supply goes to `deployer`):
//!    ```bash
//!    cargo run --package jobescrow-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --package jobescrow-sdk --example simple
//!    ```

use jobescrow_sdk::JobEscrowClient;

const OWNER: &str = "deployer";
const FREELANCER: &str = "freelancer";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("JobEscrow SDK - Simple Example");
    println!("==============================\n");

    // 1. Connect to daemon
    println!("1. Connecting to daemon...");
    let client = JobEscrowClient::connect("http://127.0.0.1:9630").await?;
    println!("   ✓ Connected\n");

    // 2. Approve and post a job
    println!("2. Posting a job with a bounty of 3...");
    client.approve(OWNER, 10).await?;
    let job = client.create_job(OWNER, "Job1", 3).await?;
    println!("   ✓ Job {} created ({})\n", job.job_id, job.status);

    // 3. Freelancer claims and finishes it
    println!("3. Freelancer takes the job...");
    client.assign_job(FREELANCER, job.job_id).await?;
    client.complete_job(FREELANCER, job.job_id).await?;
    println!("   ✓ Assigned and marked complete\n");

    // 4. Owner accepts; bounty leaves escrow
    println!("4. Owner accepts the work...");
    let accepted = client.accept_job(OWNER, job.job_id).await?;
    println!("   ✓ {} -> {}\n", accepted.event, accepted.status);

    // 5. A second accept is rejected
    match client.accept_job(OWNER, job.job_id).await {
        Err(e) if e.is_invalid_state() => println!("5. ✓ Second accept rejected: {}\n", e),
        other => println!("5. ⚠ Unexpected: {:?}\n", other.map(|r| r.status)),
    }

    // 6. Balances and audit
    let paid = client.balance(FREELANCER).await?;
    let stats = client.stats().await?;
    println!("6. {} holds {}", paid.account, paid.balance);
    println!(
        "   Escrow {} holds {} (outstanding {}, consistent: {})",
        stats.escrow_account, stats.escrow_balance, stats.outstanding, stats.escrow_consistent
    );

    println!("\n✓ Example completed successfully!");

    Ok(())
}
