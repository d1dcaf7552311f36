// Lifecycle events

use crate::domain::account::{Address, Amount};
use crate::domain::job::{JobId, JobStatus};
use serde::{Deserialize, Serialize};

/// Event emitted once per committed lifecycle transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum JobEvent {
    JobCreated {
        id: JobId,
        owner: Address,
        amount: Amount,
    },
    JobDeleted {
        id: JobId,
        owner: Address,
    },
    JobAssigned {
        id: JobId,
        freelancer: Address,
    },
    MarkJobComplete {
        id: JobId,
        freelancer: Address,
    },
    AcceptJob {
        id: JobId,
        freelancer: Address,
    },
}

impl JobEvent {
    pub fn job_id(&self) -> JobId {
        match self {
            JobEvent::JobCreated { id, .. }
            | JobEvent::JobDeleted { id, .. }
            | JobEvent::JobAssigned { id, .. }
            | JobEvent::MarkJobComplete { id, .. }
            | JobEvent::AcceptJob { id, .. } => *id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            JobEvent::JobCreated { .. } => "JobCreated",
            JobEvent::JobDeleted { .. } => "JobDeleted",
            JobEvent::JobAssigned { .. } => "JobAssigned",
            JobEvent::MarkJobComplete { .. } => "MarkJobComplete",
            JobEvent::AcceptJob { .. } => "AcceptJob",
        }
    }

    /// Status the job holds once the event is committed
    pub fn resulting_status(&self) -> JobStatus {
        match self {
            JobEvent::JobCreated { .. } => JobStatus::Pending,
            JobEvent::JobDeleted { .. } => JobStatus::Deleted,
            JobEvent::JobAssigned { .. } => JobStatus::Assigned,
            JobEvent::MarkJobComplete { .. } => JobStatus::Completed,
            JobEvent::AcceptJob { .. } => JobStatus::Accepted,
        }
    }

    /// The account named in the event (owner or freelancer)
    pub fn account(&self) -> &Address {
        match self {
            JobEvent::JobCreated { owner, .. } | JobEvent::JobDeleted { owner, .. } => owner,
            JobEvent::JobAssigned { freelancer, .. }
            | JobEvent::MarkJobComplete { freelancer, .. }
            | JobEvent::AcceptJob { freelancer, .. } => freelancer,
        }
    }
}

/// Event as stored in the event log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub seq: i64,
    pub job_id: JobId,
    pub recorded_at: i64, // epoch ms
    pub event: JobEvent,
}
