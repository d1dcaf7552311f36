// Create Job Use Case

use crate::domain::job::validate_new_job;
use crate::domain::{Address, Amount, Job, JobEvent, Principal};
use crate::error::Result;
use crate::port::{JobRepositoryTransaction, TimeProvider, TransactionalJobRepository};
use serde::{Deserialize, Serialize};

/// Create request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobRequest {
    #[serde(default)]
    pub title: String,
    pub amount: Amount,
}

impl CreateJobRequest {
    pub fn new(title: impl Into<String>, amount: Amount) -> Self {
        Self {
            title: title.into(),
            amount,
        }
    }
}

/// Validate a create request before opening a transaction
pub fn validate_request(req: &CreateJobRequest) -> Result<()> {
    validate_new_job(&req.title, req.amount)?;
    Ok(())
}

/// Execute create use case (with transaction for atomicity)
///
/// # Arguments
///
/// * `store` - Transactional job store + escrow ledger
/// * `time_provider` - Time provider (injected for determinism)
/// * `escrow` - Escrow-holding account
/// * `caller` - Authenticated principal, becomes the owner
/// * `req` - Create request
pub async fn execute(
    store: &dyn TransactionalJobRepository,
    time_provider: &dyn TimeProvider,
    escrow: &Address,
    caller: &Principal,
    req: CreateJobRequest,
) -> Result<JobEvent> {
    validate_request(&req)?;

    let now = time_provider.now_millis();
    let mut tx = store.begin_transaction().await?;
    let outcome = apply(tx.as_mut(), now, escrow, caller, req).await;

    super::finish(tx, outcome).await
}

async fn apply(
    tx: &mut dyn JobRepositoryTransaction,
    now: i64,
    escrow: &Address,
    caller: &Principal,
    req: CreateJobRequest,
) -> Result<JobEvent> {
    // Funds first: nothing is recorded unless the bounty reached escrow
    tx.pull_transfer(caller.address(), escrow, req.amount).await?;

    let id = tx.next_job_id().await?;
    let job = Job::new(id, req.title, req.amount, caller.address().clone(), now);
    tx.insert(&job).await?;

    let event = JobEvent::JobCreated {
        id,
        owner: job.owner,
        amount: job.amount,
    };
    tx.append_event(&event, now).await?;

    Ok(event)
}
