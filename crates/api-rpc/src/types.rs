//! RPC Request/Response Types
//!
//! JSON-RPC method parameters and results. Account fields travel as plain
//! strings and are validated by the handler.

use jobescrow_core::domain::{Amount, EventRecord, Job, JobEvent, JobId, JobStatus};
use serde::{Deserialize, Serialize};

/// job.create.v1 - Create a job, pulling the bounty into escrow
#[derive(Debug, Deserialize)]
pub struct CreateJobParams {
    pub caller: String,
    #[serde(default)]
    pub title: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateJobResponse {
    pub job_id: JobId,
    pub owner: String,
    pub amount: Amount,
    pub status: JobStatus,
}

/// job.delete.v1 / job.assign.v1 / job.complete.v1 / job.accept.v1
#[derive(Debug, Deserialize)]
pub struct JobActionParams {
    pub caller: String,
    pub job_id: JobId,
}

/// Committed transition
#[derive(Debug, Clone, Serialize)]
pub struct JobEventResponse {
    pub job_id: JobId,
    /// Event name (`JobDeleted`, `JobAssigned`, ...)
    pub event: String,
    /// Owner for create/delete, freelancer otherwise
    pub account: String,
    pub status: JobStatus,
}

impl From<JobEvent> for JobEventResponse {
    fn from(event: JobEvent) -> Self {
        Self {
            job_id: event.job_id(),
            event: event.name().to_string(),
            account: event.account().to_string(),
            status: event.resulting_status(),
        }
    }
}

/// job.get.v1 - Fetch a job
#[derive(Debug, Deserialize)]
pub struct GetJobParams {
    pub job_id: JobId,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobView {
    pub job_id: JobId,
    pub title: String,
    pub amount: Amount,
    pub owner: String,
    pub freelancer: Option<String>,
    pub status: JobStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Job> for JobView {
    fn from(job: Job) -> Self {
        Self {
            job_id: job.id,
            title: job.title,
            amount: job.amount,
            owner: job.owner.into(),
            freelancer: job.freelancer.map(Into::into),
            status: job.status,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

/// job.events.v1 - Read the event log
#[derive(Debug, Deserialize)]
pub struct EventsParams {
    #[serde(default)]
    pub job_id: Option<JobId>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

pub const DEFAULT_EVENT_LIMIT: u32 = 100;
pub const MAX_EVENT_LIMIT: u32 = 1000;

fn default_limit() -> u32 {
    DEFAULT_EVENT_LIMIT
}

impl Default for EventsParams {
    fn default() -> Self {
        Self {
            job_id: None,
            limit: DEFAULT_EVENT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventsResponse {
    pub events: Vec<EventRecord>,
}

/// ledger.balance.v1 - Balance of an account
#[derive(Debug, Deserialize)]
pub struct BalanceParams {
    pub account: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceResponse {
    pub account: String,
    pub balance: Amount,
}

/// ledger.approve.v1 - Let the escrow account pull up to `amount`
#[derive(Debug, Deserialize)]
pub struct ApproveParams {
    pub caller: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApproveResponse {
    pub owner: String,
    pub spender: String,
    pub allowance: Amount,
}

/// admin.stats.v1 - Registry statistics and escrow audit
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub job_count: u64,
    pub pending_jobs: i64,
    pub assigned_jobs: i64,
    pub completed_jobs: i64,
    pub accepted_jobs: i64,
    pub deleted_jobs: i64,
    pub escrow_account: String,
    pub escrow_balance: Amount,
    pub outstanding: Amount,
    pub escrow_consistent: bool,
    pub uptime_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_params_defaults() {
        let params: EventsParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.job_id, None);
        assert_eq!(params.limit, DEFAULT_EVENT_LIMIT);
    }

    #[test]
    fn test_create_params_title_optional() {
        let params: CreateJobParams =
            serde_json::from_str(r#"{"caller": "owner", "amount": 3}"#).unwrap();
        assert_eq!(params.title, "");
        assert_eq!(params.amount, 3);
    }
}
