// SQLite JobRepository Implementation

use crate::error::map_sqlx_error;
use crate::row::{from_db_amount, from_db_id, to_db_id, EventRow, JobRow, JOB_COLUMNS};
use crate::SqliteJobTransaction;
use async_trait::async_trait;
use jobescrow_core::domain::{Amount, EventRecord, Job, JobId, JobStatus};
use jobescrow_core::error::Result;
use jobescrow_core::port::{JobRepository, JobRepositoryTransaction, TransactionalJobRepository};
use sqlx::SqlitePool;

pub struct SqliteJobRepository {
    pool: SqlitePool,
}

impl SqliteJobRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for SqliteJobRepository {
    async fn find_by_id(&self, id: JobId) -> Result<Option<Job>> {
        let row: Option<JobRow> =
            sqlx::query_as(&format!("SELECT {} FROM jobs WHERE id = ?", JOB_COLUMNS))
                .bind(to_db_id(id)?)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        row.map(JobRow::into_job).transpose()
    }

    async fn job_count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT job_count FROM registry_state WHERE id = 1")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        from_db_id(count)
    }

    async fn count_by_status(&self, status: JobStatus) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count)
    }

    async fn find_by_status(&self, status: JobStatus) -> Result<Vec<Job>> {
        let rows: Vec<JobRow> = sqlx::query_as(&format!(
            "SELECT {} FROM jobs WHERE status = ? ORDER BY id ASC",
            JOB_COLUMNS
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(JobRow::into_job).collect()
    }

    async fn escrowed_total(&self) -> Result<Amount> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0) FROM jobs
            WHERE status IN ('PENDING', 'ASSIGNED', 'COMPLETED')
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        from_db_amount(total)
    }

    async fn list_events(&self, job_id: Option<JobId>, limit: u32) -> Result<Vec<EventRecord>> {
        let job_id = job_id.map(to_db_id).transpose()?;

        let rows: Vec<EventRow> = sqlx::query_as(
            r#"
            SELECT seq, job_id, payload, recorded_at FROM job_events
            WHERE (? IS NULL OR job_id = ?)
            ORDER BY seq ASC
            LIMIT ?
            "#,
        )
        .bind(job_id)
        .bind(job_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(EventRow::into_record).collect()
    }
}

#[async_trait]
impl TransactionalJobRepository for SqliteJobRepository {
    async fn begin_transaction(&self) -> Result<Box<dyn JobRepositoryTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteJobTransaction::new(tx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations, SqliteLedger};
    use jobescrow_core::domain::{Address, DomainError, JobEvent, Principal};
    use jobescrow_core::port::LedgerAccounts;
    use jobescrow_core::AppError;

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    async fn setup_repo() -> (SqliteJobRepository, SqliteLedger) {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        let ledger = SqliteLedger::new(pool.clone());
        ledger.mint_genesis(&addr("owner"), 1000).await.unwrap();
        ledger
            .approve(&Principal::new(addr("owner")), &addr("escrow"), 100)
            .await
            .unwrap();

        (SqliteJobRepository::new(pool), ledger)
    }

    async fn create_in_tx(repo: &SqliteJobRepository, title: &str, amount: Amount) -> Job {
        let mut tx = repo.begin_transaction().await.unwrap();
        tx.pull_transfer(&addr("owner"), &addr("escrow"), amount)
            .await
            .unwrap();
        let id = tx.next_job_id().await.unwrap();
        let job = Job::new(id, title, amount, addr("owner"), 1000);
        tx.insert(&job).await.unwrap();
        tx.append_event(
            &JobEvent::JobCreated {
                id,
                owner: addr("owner"),
                amount,
            },
            1000,
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();
        job
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let (repo, _ledger) = setup_repo().await;
        let job = create_in_tx(&repo, "Job1", 3).await;

        assert_eq!(job.id, 1);
        let found = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(found, job);
        assert!(repo.find_by_id(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_job_ids_are_sequential() {
        let (repo, _ledger) = setup_repo().await;
        for expected in 1..=3 {
            let job = create_in_tx(&repo, "Job", 1).await;
            assert_eq!(job.id, expected);
        }
        assert_eq!(repo.job_count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_rollback_discards_everything() {
        let (repo, ledger) = setup_repo().await;

        let mut tx = repo.begin_transaction().await.unwrap();
        tx.pull_transfer(&addr("owner"), &addr("escrow"), 5)
            .await
            .unwrap();
        let id = tx.next_job_id().await.unwrap();
        tx.insert(&Job::new(id, "Job1", 5, addr("owner"), 1000))
            .await
            .unwrap();
        tx.rollback().await.unwrap();

        assert_eq!(repo.job_count().await.unwrap(), 0);
        assert!(repo.find_by_id(id).await.unwrap().is_none());
        assert_eq!(ledger.balance_of(&addr("owner")).await.unwrap(), 1000);
        assert_eq!(ledger.balance_of(&addr("escrow")).await.unwrap(), 0);
        assert_eq!(
            ledger.allowance(&addr("owner"), &addr("escrow")).await.unwrap(),
            100
        );
    }

    #[tokio::test]
    async fn test_update_rejects_stale_status() {
        let (repo, _ledger) = setup_repo().await;
        let mut job = create_in_tx(&repo, "Job1", 3).await;

        let mut tx = repo.begin_transaction().await.unwrap();
        job.assign(&Principal::new(addr("freelancer")), 2000).unwrap();

        // Stored status is PENDING, not ASSIGNED
        let err = tx.update(&job, JobStatus::Assigned).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        tx.update(&job, JobStatus::Pending).await.unwrap();
        tx.commit().await.unwrap();

        let stored = repo.find_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Assigned);
        assert_eq!(stored.freelancer, Some(addr("freelancer")));
        assert_eq!(stored.updated_at, 2000);
    }

    #[tokio::test]
    async fn test_status_queries_and_escrowed_total() {
        let (repo, _ledger) = setup_repo().await;
        create_in_tx(&repo, "A", 3).await;
        create_in_tx(&repo, "B", 4).await;
        let mut c = create_in_tx(&repo, "C", 5).await;

        let mut tx = repo.begin_transaction().await.unwrap();
        c.delete(&Principal::new(addr("owner")), 2000).unwrap();
        tx.push_transfer(&addr("escrow"), &addr("owner"), c.amount)
            .await
            .unwrap();
        tx.update(&c, JobStatus::Pending).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(repo.count_by_status(JobStatus::Pending).await.unwrap(), 2);
        assert_eq!(repo.count_by_status(JobStatus::Deleted).await.unwrap(), 1);
        let pending = repo.find_by_status(JobStatus::Pending).await.unwrap();
        assert_eq!(
            pending.iter().map(|j| j.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(repo.escrowed_total().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_push_transfer_overdraft_is_insufficient_funds() {
        let (repo, _ledger) = setup_repo().await;

        let mut tx = repo.begin_transaction().await.unwrap();
        let err = tx
            .push_transfer(&addr("escrow"), &addr("freelancer"), 1)
            .await
            .unwrap_err();
        tx.rollback().await.unwrap();

        assert!(matches!(
            err.as_domain(),
            Some(DomainError::InsufficientFunds { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_events_filters_by_job() {
        let (repo, _ledger) = setup_repo().await;
        create_in_tx(&repo, "A", 1).await;
        create_in_tx(&repo, "B", 2).await;

        let all = repo.list_events(None, 100).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].seq < all[1].seq);

        let only_b = repo.list_events(Some(2), 100).await.unwrap();
        assert_eq!(only_b.len(), 1);
        assert_eq!(
            only_b[0].event,
            JobEvent::JobCreated {
                id: 2,
                owner: addr("owner"),
                amount: 2
            }
        );

        assert_eq!(repo.list_events(None, 1).await.unwrap().len(), 1);
    }
}
