//! SDK Response Types
//!
//! Mirrors the JSON-RPC results of the api-rpc crate.

use serde::Deserialize;

/// Result of `job.create.v1`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJobResponse {
    pub job_id: u64,
    pub owner: String,
    pub amount: u64,
    pub status: String,
}

/// Result of delete/assign/complete/accept
#[derive(Debug, Clone, Deserialize)]
pub struct JobEventResponse {
    pub job_id: u64,
    pub event: String,
    pub account: String,
    pub status: String,
}

/// Result of `job.get.v1`
#[derive(Debug, Clone, Deserialize)]
pub struct JobView {
    pub job_id: u64,
    pub title: String,
    pub amount: u64,
    pub owner: String,
    pub freelancer: Option<String>,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Entry of the event log; `event` keeps the tagged payload
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    pub seq: i64,
    pub job_id: u64,
    pub recorded_at: i64,
    pub event: serde_json::Value,
}

impl EventRecord {
    /// Event name (`JobCreated`, `AcceptJob`, ...)
    pub fn name(&self) -> &str {
        self.event["event"].as_str().unwrap_or_default()
    }
}

/// Result of `job.events.v1`
#[derive(Debug, Clone, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<EventRecord>,
}

/// Result of `ledger.balance.v1`
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
    pub account: String,
    pub balance: u64,
}

/// Result of `ledger.approve.v1`
#[derive(Debug, Clone, Deserialize)]
pub struct ApproveResponse {
    pub owner: String,
    pub spender: String,
    pub allowance: u64,
}

/// Result of `admin.stats.v1`
#[derive(Debug, Clone, Deserialize)]
pub struct StatsResponse {
    pub job_count: u64,
    pub pending_jobs: i64,
    pub assigned_jobs: i64,
    pub completed_jobs: i64,
    pub accepted_jobs: i64,
    pub deleted_jobs: i64,
    pub escrow_account: String,
    pub escrow_balance: u64,
    pub outstanding: u64,
    pub escrow_consistent: bool,
    pub uptime_seconds: u64,
}
