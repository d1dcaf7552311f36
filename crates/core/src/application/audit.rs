// Escrow audit: ledger balance of the escrow account vs. outstanding bounties

use crate::application::JobRegistry;
use crate::domain::Amount;
use crate::error::Result;
use crate::port::{JobRepository, LedgerAccounts};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

/// Audit result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowAudit {
    /// Ledger balance of the escrow account
    pub escrow_balance: Amount,
    /// Sum of bounties of PENDING, ASSIGNED and COMPLETED jobs
    pub outstanding: Amount,
    pub consistent: bool,
}

/// Checks `escrow balance == sum(amount of non-terminal jobs)`
pub struct EscrowAuditor {
    registry: Arc<JobRegistry>,
    job_repo: Arc<dyn JobRepository>,
    ledger: Arc<dyn LedgerAccounts>,
}

impl EscrowAuditor {
    pub fn new(
        registry: Arc<JobRegistry>,
        job_repo: Arc<dyn JobRepository>,
        ledger: Arc<dyn LedgerAccounts>,
    ) -> Self {
        Self {
            registry,
            job_repo,
            ledger,
        }
    }

    /// Run the audit between lifecycle operations
    pub async fn audit(&self) -> Result<EscrowAudit> {
        let _quiet = self.registry.quiesce().await;

        let escrow_balance = self
            .ledger
            .balance_of(self.registry.escrow_account())
            .await?;
        let outstanding = self.job_repo.escrowed_total().await?;

        let audit = EscrowAudit {
            escrow_balance,
            outstanding,
            consistent: escrow_balance == outstanding,
        };

        if audit.consistent {
            debug!(escrow_balance, outstanding, "Escrow audit passed");
        } else {
            error!(
                escrow_balance,
                outstanding,
                escrow_account = %self.registry.escrow_account(),
                "Escrow audit mismatch"
            );
        }

        Ok(audit)
    }
}
