// Job Repository Port (read side)

use crate::domain::{Amount, EventRecord, Job, JobId, JobStatus};
use crate::error::Result;
use async_trait::async_trait;

/// Read-only queries over jobs and the event log
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Find job by ID
    async fn find_by_id(&self, id: JobId) -> Result<Option<Job>>;

    /// Total jobs ever created (JobCount)
    async fn job_count(&self) -> Result<u64>;

    /// Count jobs by status
    async fn count_by_status(&self, status: JobStatus) -> Result<i64>;

    /// Find all jobs by status, oldest first
    async fn find_by_status(&self, status: JobStatus) -> Result<Vec<Job>>;

    /// Sum of bounties that should currently sit in escrow
    async fn escrowed_total(&self) -> Result<Amount>;

    /// Event log, oldest first; optionally restricted to one job
    async fn list_events(&self, job_id: Option<JobId>, limit: u32) -> Result<Vec<EventRecord>>;
}
