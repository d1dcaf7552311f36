// Port Layer - Interfaces for external dependencies

pub mod escrow_ledger;
pub mod job_repository;
pub mod ledger_accounts;
pub mod time_provider;
pub mod transaction;

// Re-exports
pub use escrow_ledger::EscrowLedger;
pub use job_repository::JobRepository;
pub use ledger_accounts::LedgerAccounts;
pub use time_provider::TimeProvider;
pub use transaction::{JobRepositoryTransaction, Transaction, TransactionalJobRepository};
