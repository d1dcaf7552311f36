// Job Domain Model

use crate::domain::account::{Address, Amount, Principal, MAX_AMOUNT};
use crate::domain::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Job ID (sequential, equal to JobCount at creation)
pub type JobId = u64;

pub const MAX_TITLE_LEN: usize = 256;

/// Job Status
///
/// ```text
/// PENDING   --assign-->   ASSIGNED --complete--> COMPLETED --accept--> ACCEPTED
/// PENDING   --delete-->   DELETED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Assigned,
    Completed,
    Accepted,
    Deleted,
}

impl JobStatus {
    pub const ALL: [JobStatus; 5] = [
        JobStatus::Pending,
        JobStatus::Assigned,
        JobStatus::Completed,
        JobStatus::Accepted,
        JobStatus::Deleted,
    ];

    /// No transition leaves a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Accepted | JobStatus::Deleted)
    }

    /// Whether a job in this status still has its bounty in escrow
    pub fn holds_escrow(&self) -> bool {
        !self.is_terminal()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Assigned => "ASSIGNED",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Accepted => "ACCEPTED",
            JobStatus::Deleted => "DELETED",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PENDING" => Ok(JobStatus::Pending),
            "ASSIGNED" => Ok(JobStatus::Assigned),
            "COMPLETED" => Ok(JobStatus::Completed),
            "ACCEPTED" => Ok(JobStatus::Accepted),
            "DELETED" => Ok(JobStatus::Deleted),
            other => Err(DomainError::ValidationError(format!(
                "unknown job status: {}",
                other
            ))),
        }
    }
}

/// Role a caller must hold for an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Freelancer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Owner => write!(f, "owner"),
            Role::Freelancer => write!(f, "freelancer"),
        }
    }
}

/// Job Entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub amount: Amount,
    pub owner: Address,
    pub freelancer: Option<Address>,
    pub status: JobStatus,

    pub created_at: i64, // epoch ms
    pub updated_at: i64, // epoch ms
}

/// Check bounty and title before anything touches the ledger
pub fn validate_new_job(title: &str, amount: Amount) -> Result<()> {
    if amount == 0 {
        return Err(DomainError::ValidationError(
            "amount must be greater than zero".to_string(),
        ));
    }
    if amount > MAX_AMOUNT {
        return Err(DomainError::ValidationError(format!(
            "amount {} exceeds maximum {}",
            amount, MAX_AMOUNT
        )));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::ValidationError(format!(
            "title too long (max {} chars)",
            MAX_TITLE_LEN
        )));
    }
    Ok(())
}

impl Job {
    /// Create a new Pending job
    ///
    /// # Arguments
    ///
    /// * `id` - Sequential job ID (allocated by the store, not generated)
    /// * `title` - Opaque description
    /// * `amount` - Bounty, already pulled into escrow by the caller
    /// * `owner` - Creating principal's address
    /// * `created_at` - Creation timestamp in epoch ms (injected, not system time)
    pub fn new(
        id: JobId,
        title: impl Into<String>,
        amount: Amount,
        owner: Address,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            amount,
            owner,
            freelancer: None,
            status: JobStatus::Pending,
            created_at,
            updated_at: created_at,
        }
    }

    /// PENDING -> DELETED (owner only). Caller refunds the escrow.
    pub fn delete(&mut self, caller: &Principal, now_millis: i64) -> Result<()> {
        self.require_status(JobStatus::Pending, "delete")?;
        self.require_owner(caller)?;
        self.status = JobStatus::Deleted;
        self.updated_at = now_millis;
        Ok(())
    }

    /// PENDING -> ASSIGNED; any caller may claim, exactly once.
    pub fn assign(&mut self, caller: &Principal, now_millis: i64) -> Result<()> {
        self.require_status(JobStatus::Pending, "assign")?;
        if self.freelancer.is_some() {
            return Err(self.invalid_transition("assign"));
        }
        self.freelancer = Some(caller.address().clone());
        self.status = JobStatus::Assigned;
        self.updated_at = now_millis;
        Ok(())
    }

    /// ASSIGNED -> COMPLETED (assigned freelancer only)
    pub fn mark_complete(&mut self, caller: &Principal, now_millis: i64) -> Result<()> {
        self.require_status(JobStatus::Assigned, "mark complete")?;
        match &self.freelancer {
            Some(freelancer) if caller.is(freelancer) => {}
            _ => {
                return Err(DomainError::Unauthorized {
                    job_id: self.id,
                    caller: caller.to_string(),
                    role: Role::Freelancer,
                })
            }
        }
        self.status = JobStatus::Completed;
        self.updated_at = now_millis;
        Ok(())
    }

    /// COMPLETED -> ACCEPTED (owner only). Returns the payee.
    pub fn accept(&mut self, caller: &Principal, now_millis: i64) -> Result<Address> {
        self.require_status(JobStatus::Completed, "accept")?;
        self.require_owner(caller)?;
        let payee = self
            .freelancer
            .clone()
            .ok_or_else(|| self.invalid_transition("accept"))?;
        self.status = JobStatus::Accepted;
        self.updated_at = now_millis;
        Ok(payee)
    }

    fn require_status(&self, expected: JobStatus, operation: &str) -> Result<()> {
        if self.status != expected {
            return Err(self.invalid_transition(operation));
        }
        Ok(())
    }

    fn require_owner(&self, caller: &Principal) -> Result<()> {
        if !caller.is(&self.owner) {
            return Err(DomainError::Unauthorized {
                job_id: self.id,
                caller: caller.to_string(),
                role: Role::Owner,
            });
        }
        Ok(())
    }

    fn invalid_transition(&self, operation: &str) -> DomainError {
        DomainError::InvalidStateTransition {
            job_id: self.id,
            from: self.status.to_string(),
            operation: operation.to_string(),
        }
    }
}
