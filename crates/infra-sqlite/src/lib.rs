// JobEscrow Infrastructure - SQLite Adapter
// Implements: JobRepository, TransactionalJobRepository, EscrowLedger, LedgerAccounts

mod connection;
mod error;
mod job_repository;
mod ledger;
mod migration;
mod row;
mod transaction;

pub use connection::create_pool;
pub use job_repository::SqliteJobRepository;
pub use ledger::SqliteLedger;
pub use migration::run_migrations;
pub use transaction::SqliteJobTransaction;

// Note: sqlx::Error conversion is handled by `error::map_sqlx_error`
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
