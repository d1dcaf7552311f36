// SQLite Transaction Implementation
//
// One sqlx transaction carries the job mutation, the ledger transfer and the
// event append of a lifecycle operation.

use crate::error::map_sqlx_error;
use crate::ledger;
use crate::row::{from_db_id, to_db_amount, to_db_id, JobRow, JOB_COLUMNS};
use async_trait::async_trait;
use jobescrow_core::domain::{Address, Amount, Job, JobEvent, JobId, JobStatus};
use jobescrow_core::error::{AppError, Result};
use jobescrow_core::port::{EscrowLedger, JobRepositoryTransaction, Transaction};
use sqlx::{Sqlite, Transaction as SqlxTransaction};

pub struct SqliteJobTransaction {
    tx: SqlxTransaction<'static, Sqlite>,
}

impl SqliteJobTransaction {
    pub fn new(tx: SqlxTransaction<'static, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for SqliteJobTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl EscrowLedger for SqliteJobTransaction {
    async fn balance_of(&mut self, account: &Address) -> Result<Amount> {
        ledger::balance(&mut *self.tx, account).await
    }

    async fn pull_transfer(
        &mut self,
        from: &Address,
        to_escrow: &Address,
        amount: Amount,
    ) -> Result<()> {
        ledger::pull(&mut *self.tx, from, to_escrow, amount).await
    }

    async fn push_transfer(
        &mut self,
        from_escrow: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<()> {
        ledger::transfer(&mut *self.tx, from_escrow, to, amount).await
    }
}

#[async_trait]
impl JobRepositoryTransaction for SqliteJobTransaction {
    async fn next_job_id(&mut self) -> Result<JobId> {
        let count: i64 = sqlx::query_scalar(
            "UPDATE registry_state SET job_count = job_count + 1 WHERE id = 1 RETURNING job_count",
        )
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        from_db_id(count)
    }

    async fn find_by_id(&mut self, id: JobId) -> Result<Option<Job>> {
        let row: Option<JobRow> =
            sqlx::query_as(&format!("SELECT {} FROM jobs WHERE id = ?", JOB_COLUMNS))
                .bind(to_db_id(id)?)
                .fetch_optional(&mut *self.tx)
                .await
                .map_err(map_sqlx_error)?;

        row.map(JobRow::into_job).transpose()
    }

    async fn insert(&mut self, job: &Job) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO jobs (
                id, title, amount, owner, freelancer, status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(to_db_id(job.id)?)
        .bind(&job.title)
        .bind(to_db_amount(job.amount)?)
        .bind(job.owner.as_str())
        .bind(job.freelancer.as_ref().map(|f| f.as_str()))
        .bind(job.status.as_str())
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn update(&mut self, job: &Job, expected: JobStatus) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET freelancer = ?, status = ?, updated_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(job.freelancer.as_ref().map(|f| f.as_str()))
        .bind(job.status.as_str())
        .bind(job.updated_at)
        .bind(to_db_id(job.id)?)
        .bind(expected.as_str())
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "job {} is no longer {}",
                job.id, expected
            )));
        }
        Ok(())
    }

    async fn append_event(&mut self, event: &JobEvent, recorded_at: i64) -> Result<()> {
        let payload = serde_json::to_string(event)?;

        sqlx::query(
            "INSERT INTO job_events (job_id, event_type, payload, recorded_at) VALUES (?, ?, ?, ?)",
        )
        .bind(to_db_id(event.job_id())?)
        .bind(event.name())
        .bind(payload)
        .bind(recorded_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}
