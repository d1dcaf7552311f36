// Row types and integer conversions shared by repository and transaction

use jobescrow_core::domain::{Address, Amount, EventRecord, Job, JobId, JobStatus};
use jobescrow_core::error::{AppError, Result};

pub(crate) const JOB_COLUMNS: &str =
    "id, title, amount, owner, freelancer, status, created_at, updated_at";

pub(crate) fn to_db_amount(amount: Amount) -> Result<i64> {
    i64::try_from(amount)
        .map_err(|_| AppError::Validation(format!("amount {} out of range", amount)))
}

pub(crate) fn from_db_amount(value: i64) -> Result<Amount> {
    Amount::try_from(value)
        .map_err(|_| AppError::Internal(format!("negative amount in store: {}", value)))
}

pub(crate) fn to_db_id(id: JobId) -> Result<i64> {
    i64::try_from(id).map_err(|_| AppError::Validation(format!("job id {} out of range", id)))
}

pub(crate) fn from_db_id(value: i64) -> Result<JobId> {
    JobId::try_from(value)
        .map_err(|_| AppError::Internal(format!("negative job id in store: {}", value)))
}

fn stored_address(value: String) -> Result<Address> {
    Address::parse(value).map_err(|e| AppError::Internal(format!("corrupt address: {}", e)))
}

#[derive(sqlx::FromRow)]
pub(crate) struct JobRow {
    id: i64,
    title: String,
    amount: i64,
    owner: String,
    freelancer: Option<String>,
    status: String,
    created_at: i64,
    updated_at: i64,
}

impl JobRow {
    pub(crate) fn into_job(self) -> Result<Job> {
        let status: JobStatus = self
            .status
            .parse()
            .map_err(|e| AppError::Internal(format!("corrupt job {}: {}", self.id, e)))?;

        Ok(Job {
            id: from_db_id(self.id)?,
            title: self.title,
            amount: from_db_amount(self.amount)?,
            owner: stored_address(self.owner)?,
            freelancer: self.freelancer.map(stored_address).transpose()?,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct EventRow {
    seq: i64,
    job_id: i64,
    payload: String,
    recorded_at: i64,
}

impl EventRow {
    pub(crate) fn into_record(self) -> Result<EventRecord> {
        Ok(EventRecord {
            seq: self.seq,
            job_id: from_db_id(self.job_id)?,
            recorded_at: self.recorded_at,
            event: serde_json::from_str(&self.payload)?,
        })
    }
}
