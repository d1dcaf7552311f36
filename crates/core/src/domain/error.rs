// Domain Error Types

use crate::domain::account::Amount;
use crate::domain::job::{JobId, Role};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unauthorized: {caller} is not the {role} of job {job_id}")]
    Unauthorized {
        job_id: JobId,
        caller: String,
        role: Role,
    },

    #[error("Invalid job state transition: job {job_id} is {from}, cannot {operation}")]
    InvalidStateTransition {
        job_id: JobId,
        from: String,
        operation: String,
    },

    #[error("Insufficient funds: {account} requested {requested}, available {available}")]
    InsufficientFunds {
        account: String,
        requested: Amount,
        available: Amount,
    },

    #[error("Job not found: {0}")]
    JobNotFound(JobId),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
