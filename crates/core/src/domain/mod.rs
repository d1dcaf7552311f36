// Domain Layer - Pure business logic and entities

pub mod account;
pub mod error;
pub mod event;
pub mod job;

// Re-exports
pub use account::{Address, Amount, Principal, MAX_AMOUNT};
pub use error::DomainError;
pub use event::{EventRecord, JobEvent};
pub use job::{Job, JobId, JobStatus, Role};
