//! JSON-RPC API Layer
//!
//! JSON-RPC 2.0 surface over the job registry and the escrow ledger.

pub mod error;
pub mod handler;
pub mod rate_limiter;
pub mod server;
pub mod types;

pub use error::RpcError;
pub use handler::RpcHandler;
pub use server::{RpcServer, RpcServerConfig};
