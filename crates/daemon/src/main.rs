//! JobEscrow - Daemon Entry Point
//!
//! Composition root: opens the store, seeds the ledger, wires the registry
//! and serves JSON-RPC until Ctrl+C.

mod config;
mod telemetry;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

use config::DaemonConfig;
use jobescrow_api_rpc::RpcServer;
use jobescrow_core::application::{EscrowAuditor, JobRegistry};
use jobescrow_core::port::time_provider::SystemTimeProvider;
use jobescrow_core::port::LedgerAccounts;
use jobescrow_infra_sqlite::{create_pool, run_migrations, SqliteJobRepository, SqliteLedger};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Configuration, then logging (the log format is configurable)
    let config = DaemonConfig::load()?;
    let _log_guard = telemetry::init(&config)?;

    info!("JobEscrow daemon v{} starting...", VERSION);

    let accounts = config.accounts()?;

    // 2. Database
    info!(db_path = %config.db_path, "Initializing database...");
    if let Some(parent) = Path::new(&config.db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let pool = create_pool(&config.db_path)
        .await
        .context("DB pool creation failed")?;
    run_migrations(&pool).await.context("Migration failed")?;

    // 3. Ledger genesis (first start only)
    let ledger = Arc::new(SqliteLedger::new(pool.clone()));
    if ledger
        .mint_genesis(&accounts.genesis, config.genesis_supply)
        .await
        .context("Genesis mint failed")?
    {
        info!(
            account = %accounts.genesis,
            supply = config.genesis_supply,
            "Ledger initialized"
        );
    }

    // 4. Wiring
    let job_repo = Arc::new(SqliteJobRepository::new(pool.clone()));
    let registry = Arc::new(JobRegistry::new(
        job_repo.clone(),
        Arc::new(SystemTimeProvider),
        accounts.escrow.clone(),
    ));

    // 5. Startup audit
    let auditor = EscrowAuditor::new(registry.clone(), job_repo.clone(), ledger.clone());
    match auditor.audit().await {
        Ok(audit) if audit.consistent => info!(
            escrow = %accounts.escrow,
            outstanding = audit.outstanding,
            "Escrow audit passed"
        ),
        Ok(_) => warn!("Escrow audit mismatch at startup; see previous error"),
        Err(e) => error!(error = %e, "Escrow audit failed"),
    }

    // 6. JSON-RPC server
    let rpc_server = RpcServer::new(config.rpc(), registry, job_repo, ledger);
    let (addr, rpc_handle) = rpc_server
        .start()
        .await
        .context("RPC server start failed")?;

    info!(%addr, "System ready");
    info!("Press Ctrl+C to shutdown");

    // 7. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    if let Err(e) = rpc_handle.stop() {
        warn!(error = %e, "RPC server already stopped");
    }
    rpc_handle.stopped().await;
    pool.close().await;
    telemetry::shutdown();

    info!("Shutdown complete.");
    Ok(())
}
