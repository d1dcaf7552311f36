//! Shared wiring for integration tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use jobescrow_core::application::{EscrowAudit, EscrowAuditor, JobRegistry};
use jobescrow_core::domain::{Address, Amount, Job, JobId, Principal};
use jobescrow_core::port::time_provider::SystemTimeProvider;
use jobescrow_core::port::{JobRepository, LedgerAccounts};
use jobescrow_infra_sqlite::{create_pool, run_migrations, SqliteJobRepository, SqliteLedger};
use sqlx::SqlitePool;

pub const ESCROW: &str = "escrow";
pub const OWNER: &str = "owner";
pub const FREELANCER: &str = "freelancer";
pub const GENESIS_SUPPLY: Amount = 1000;

pub fn addr(s: &str) -> Address {
    Address::parse(s).unwrap()
}

pub fn who(s: &str) -> Principal {
    Principal::new(addr(s))
}

/// Registry wired to SQLite, genesis supply credited to `OWNER`
pub struct Harness {
    pub pool: SqlitePool,
    pub repo: Arc<SqliteJobRepository>,
    pub ledger: Arc<SqliteLedger>,
    pub registry: Arc<JobRegistry>,
    pub auditor: EscrowAuditor,
}

impl Harness {
    pub async fn in_memory() -> Self {
        Self::open("sqlite::memory:").await
    }

    pub async fn open(url: &str) -> Self {
        let pool = create_pool(url).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let repo = Arc::new(SqliteJobRepository::new(pool.clone()));
        let ledger = Arc::new(SqliteLedger::new(pool.clone()));
        ledger.mint_genesis(&addr(OWNER), GENESIS_SUPPLY).await.unwrap();

        let registry = Arc::new(JobRegistry::new(
            repo.clone(),
            Arc::new(SystemTimeProvider),
            addr(ESCROW),
        ));
        let auditor = EscrowAuditor::new(registry.clone(), repo.clone(), ledger.clone());

        Self {
            pool,
            repo,
            ledger,
            registry,
            auditor,
        }
    }

    pub async fn balance(&self, account: &str) -> Amount {
        self.ledger.balance_of(&addr(account)).await.unwrap()
    }

    pub async fn approve(&self, account: &str, amount: Amount) {
        self.ledger
            .approve(&who(account), &addr(ESCROW), amount)
            .await
            .unwrap();
    }

    /// Credit `amount` to `account` outside the registry
    pub async fn fund(&self, account: &str, amount: Amount) {
        sqlx::query(
            r#"
            INSERT INTO balances (account, balance) VALUES (?, ?)
            ON CONFLICT (account) DO UPDATE SET balance = balance + excluded.balance
            "#,
        )
        .bind(account)
        .bind(amount as i64)
        .execute(&self.pool)
        .await
        .unwrap();
    }

    pub async fn job(&self, id: JobId) -> Job {
        self.repo.find_by_id(id).await.unwrap().unwrap()
    }

    pub async fn event_count(&self) -> usize {
        self.repo.list_events(None, 10_000).await.unwrap().len()
    }

    pub async fn audit(&self) -> EscrowAudit {
        let audit = self.auditor.audit().await.unwrap();
        assert!(
            audit.consistent,
            "escrow holds {} but {} is outstanding",
            audit.escrow_balance, audit.outstanding
        );
        audit
    }
}

/// Unique database file under the system temp dir (removed on drop)
pub struct TempDb {
    pub path: PathBuf,
}

impl TempDb {
    pub fn new(name: &str) -> Self {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let path = std::env::temp_dir().join(format!(
            "jobescrow-{}-{}-{}.db",
            name,
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        let db = Self { path };
        db.cleanup();
        db
    }

    pub fn url(&self) -> String {
        format!("sqlite://{}", self.path.display())
    }

    fn cleanup(&self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        self.cleanup();
    }
}
