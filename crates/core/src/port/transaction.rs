// Transaction port for atomic lifecycle operations

use crate::domain::{Job, JobEvent, JobId, JobStatus};
use crate::error::Result;
use crate::port::EscrowLedger;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Entry point for lifecycle operations
#[async_trait]
pub trait TransactionalJobRepository: Send + Sync {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> Result<Box<dyn JobRepositoryTransaction>>;
}

/// Job store and escrow ledger operations sharing one transaction
#[async_trait]
pub trait JobRepositoryTransaction: Transaction + EscrowLedger {
    /// Increment JobCount and return the new value as the next job ID
    async fn next_job_id(&mut self) -> Result<JobId>;

    /// Find job by ID (within transaction)
    async fn find_by_id(&mut self, id: JobId) -> Result<Option<Job>>;

    /// Insert job (within transaction)
    async fn insert(&mut self, job: &Job) -> Result<()>;

    /// Persist `job` only if its stored status is still `expected`.
    ///
    /// Fails with `AppError::Conflict` when the stored row moved on.
    async fn update(&mut self, job: &Job, expected: JobStatus) -> Result<()>;

    /// Append to the event log (within transaction)
    async fn append_event(&mut self, event: &JobEvent, recorded_at: i64) -> Result<()>;
}
