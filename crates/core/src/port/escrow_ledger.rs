// Escrow Ledger Port
//
// The three capabilities the registry needs from the fungible-balance ledger.
// Implemented by the store transaction so a transfer commits together with
// the job mutation that caused it.

use crate::domain::{Address, Amount};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait EscrowLedger: Send {
    /// Current balance of `account` (0 for unknown accounts)
    async fn balance_of(&mut self, account: &Address) -> Result<Amount>;

    /// Move `amount` from `from` into `to_escrow`, consuming the allowance
    /// `from` granted to `to_escrow`.
    ///
    /// Fails with `DomainError::InsufficientFunds` when either the balance or
    /// the approved allowance is short.
    async fn pull_transfer(&mut self, from: &Address, to_escrow: &Address, amount: Amount)
        -> Result<()>;

    /// Move `amount` out of escrow to `to`
    async fn push_transfer(&mut self, from_escrow: &Address, to: &Address, amount: Amount)
        -> Result<()>;
}
