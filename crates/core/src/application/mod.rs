// Application Layer - Use Cases and Business Logic

pub mod audit;
pub mod job_registry;

// Re-exports
pub use audit::{EscrowAudit, EscrowAuditor};
pub use job_registry::{CreateJobRequest, JobRegistry};
