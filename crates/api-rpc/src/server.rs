//! JSON-RPC Server
//!
//! Serves the registry over JSON-RPC 2.0 on TCP, localhost by default.

use crate::error::RpcError;
use crate::handler::RpcHandler;
use crate::rate_limiter::RateLimiter;
use crate::types::{
    ApproveParams, BalanceParams, CreateJobParams, EventsParams, GetJobParams, JobActionParams,
};
use jobescrow_core::application::JobRegistry;
use jobescrow_core::port::{JobRepository, LedgerAccounts};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_RPC_HOST: &str = "127.0.0.1";
pub const DEFAULT_RPC_PORT: u16 = 9630;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
    /// Token bucket capacity for mutating calls (0 disables limiting)
    pub rate_limit_burst: u32,
    pub rate_limit_per_sec: u32,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
            rate_limit_burst: 200,
            rate_limit_per_sec: 100,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

// Registers `$method` so that it parses `$params` and forwards to `$call`
macro_rules! register {
    ($module:expr, $handler:expr, $method:literal, $params:ty, $call:ident) => {{
        let handler = $handler.clone();
        $module
            .register_async_method($method, move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: $params = params.parse()?;
                    handler.$call(req).await
                }
            })
            .map_err(|e| RpcError::Register {
                method: $method,
                reason: e.to_string(),
            })?;
    }};
}

impl RpcServer {
    pub fn new(
        config: RpcServerConfig,
        registry: Arc<JobRegistry>,
        job_repo: Arc<dyn JobRepository>,
        ledger: Arc<dyn LedgerAccounts>,
    ) -> Self {
        let rate_limiter = RateLimiter::new(config.rate_limit_burst, config.rate_limit_per_sec);
        Self {
            handler: Arc::new(RpcHandler::new(registry, job_repo, ledger, rate_limiter)),
            config,
        }
    }

    /// Start the JSON-RPC server; returns the bound address and a stop handle
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle), RpcError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| RpcError::Bind {
                addr: addr.clone(),
                reason: e.to_string(),
            })?;
        let local_addr = server.local_addr().map_err(|e| RpcError::Bind {
            addr: addr.clone(),
            reason: e.to_string(),
        })?;

        let module = self.module()?;
        let handle = server.start(module);

        info!(addr = %local_addr, "JSON-RPC server listening");
        Ok((local_addr, handle))
    }

    fn module(&self) -> Result<RpcModule<()>, RpcError> {
        let mut module = RpcModule::new(());

        // Lifecycle
        register!(module, self.handler, "job.create.v1", CreateJobParams, create_job);
        register!(module, self.handler, "job.delete.v1", JobActionParams, delete_job);
        register!(module, self.handler, "job.assign.v1", JobActionParams, assign_job);
        register!(module, self.handler, "job.complete.v1", JobActionParams, complete_job);
        register!(module, self.handler, "job.accept.v1", JobActionParams, accept_job);

        // Queries
        register!(module, self.handler, "job.get.v1", GetJobParams, get_job);
        register!(module, self.handler, "ledger.balance.v1", BalanceParams, balance);
        register!(module, self.handler, "ledger.approve.v1", ApproveParams, approve);

        // All params optional
        let handler = self.handler.clone();
        module
            .register_async_method("job.events.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: Option<EventsParams> = params.parse()?;
                    handler.events(req.unwrap_or_default()).await
                }
            })
            .map_err(|e| RpcError::Register {
                method: "job.events.v1",
                reason: e.to_string(),
            })?;

        let handler = self.handler.clone();
        module
            .register_async_method("admin.stats.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.stats().await }
            })
            .map_err(|e| RpcError::Register {
                method: "admin.stats.v1",
                reason: e.to_string(),
            })?;

        Ok(module)
    }
}
