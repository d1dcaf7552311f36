//! JobEscrow SDK - Rust Client Library
//!
//! Typed client for the JobEscrow daemon's JSON-RPC API.
//!
//! # Example
//!
//! ```no_run
//! use jobescrow_sdk::JobEscrowClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = JobEscrowClient::connect("http://127.0.0.1:9630").await?;
//!
//!     // The owner lets the escrow account pull the bounty, then posts the job
//!     client.approve("alice", 10).await?;
//!     let job = client.create_job("alice", "Fix the build", 3).await?;
//!
//!     println!("Job {} is {}", job.job_id, job.status);
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::JobEscrowClient;
pub use error::{Result, SdkError};
pub use types::{
    ApproveResponse, BalanceResponse, CreateJobResponse, EventRecord, EventsResponse,
    JobEventResponse, JobView, StatsResponse,
};
