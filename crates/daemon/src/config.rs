//! Daemon configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file (`~/.jobescrow/config.toml` or `$JOBESCROW_CONFIG`), then
//! `JOBESCROW_*` environment variables.

use anyhow::{ensure, Context, Result};
use config::{Config, Environment, File, FileFormat};
use jobescrow_api_rpc::RpcServerConfig;
use jobescrow_core::domain::{Address, Amount};
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "~/.jobescrow/config.toml";
const DEFAULT_DB_PATH: &str = "~/.jobescrow/escrow.db";

#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    pub db_path: String,
    pub rpc_host: String,
    pub rpc_port: u16,
    pub escrow_account: String,
    pub genesis_account: String,
    pub genesis_supply: Amount,
    /// `pretty` or `json`
    pub log_format: String,
    pub log_dir: Option<String>,
    pub rate_limit_burst: u32,
    pub rate_limit_per_sec: u32,
}

/// Accounts the daemon operates with, validated
#[derive(Debug, Clone)]
pub struct Accounts {
    pub escrow: Address,
    pub genesis: Address,
}

impl DaemonConfig {
    /// Load from the default file location (or `$JOBESCROW_CONFIG`) and env
    pub fn load() -> Result<Self> {
        let file = std::env::var("JOBESCROW_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        Self::load_from(&shellexpand::tilde(&file))
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let mut config: DaemonConfig = Config::builder()
            .set_default("db_path", DEFAULT_DB_PATH)?
            .set_default("rpc_host", jobescrow_api_rpc::server::DEFAULT_RPC_HOST)?
            .set_default("rpc_port", i64::from(jobescrow_api_rpc::server::DEFAULT_RPC_PORT))?
            .set_default("escrow_account", "escrow")?
            .set_default("genesis_account", "deployer")?
            .set_default("genesis_supply", 1000)?
            .set_default("log_format", "pretty")?
            .set_default("rate_limit_burst", 200)?
            .set_default("rate_limit_per_sec", 100)?
            .add_source(File::new(path, FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix("JOBESCROW").try_parsing(true))
            .build()
            .with_context(|| format!("Failed to read configuration ({})", path))?
            .try_deserialize()
            .context("Invalid configuration")?;

        config.db_path = shellexpand::tilde(&config.db_path).into_owned();
        config.log_dir = config
            .log_dir
            .map(|dir| shellexpand::tilde(&dir).into_owned());

        Ok(config)
    }

    pub fn accounts(&self) -> Result<Accounts> {
        let escrow = Address::parse(self.escrow_account.as_str())
            .context("escrow_account is not a valid address")?;
        let genesis = Address::parse(self.genesis_account.as_str())
            .context("genesis_account is not a valid address")?;
        ensure!(
            escrow != genesis,
            "genesis_account must differ from escrow_account"
        );

        Ok(Accounts { escrow, genesis })
    }

    pub fn rpc(&self) -> RpcServerConfig {
        RpcServerConfig {
            host: self.rpc_host.clone(),
            port: self.rpc_port,
            rate_limit_burst: self.rate_limit_burst,
            rate_limit_per_sec: self.rate_limit_per_sec,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};
    use tokio_test::assert_err;

    fn temp_config(contents: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "jobescrow-config-{}-{}.toml",
            std::process::id(),
            nanos
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_file() {
        let config = DaemonConfig::load_from("/nonexistent/jobescrow.toml").unwrap();

        assert_eq!(config.rpc_port, 9630);
        assert_eq!(config.escrow_account, "escrow");
        assert_eq!(config.genesis_supply, 1000);
        assert!(config.db_path.ends_with(".jobescrow/escrow.db"));
        assert!(!config.db_path.starts_with('~'));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = temp_config(
            r#"
            rpc_port = 9700
            genesis_account = "alice"
            genesis_supply = 50
            log_format = "json"
            "#,
        );

        let config = DaemonConfig::load_from(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.rpc_port, 9700);
        assert_eq!(config.genesis_account, "alice");
        assert_eq!(config.genesis_supply, 50);
        assert_eq!(config.log_format, "json");
        // Untouched keys keep defaults
        assert_eq!(config.rpc_host, "127.0.0.1");
        assert_eq!(config.rpc().rate_limit_burst, 200);
    }

    #[test]
    fn test_accounts_must_differ() {
        let path = temp_config(r#"genesis_account = "escrow""#);
        let config = DaemonConfig::load_from(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_err!(config.accounts());
    }

    #[test]
    fn test_invalid_account_rejected() {
        let path = temp_config(r#"escrow_account = "not valid""#);
        let config = DaemonConfig::load_from(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_err!(config.accounts());
    }
}
