// Ledger Accounts Port (non-transactional ledger surface)

use crate::domain::{Address, Amount, Principal};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait LedgerAccounts: Send + Sync {
    /// Balance of `account` (0 for unknown accounts)
    async fn balance_of(&self, account: &Address) -> Result<Amount>;

    /// Allowance `owner` granted to `spender`
    async fn allowance(&self, owner: &Address, spender: &Address) -> Result<Amount>;

    /// Set (not add to) the allowance `owner` grants `spender`
    async fn approve(&self, owner: &Principal, spender: &Address, amount: Amount) -> Result<()>;

    /// Credit the initial supply to `account`, only while the ledger holds no
    /// balances. Returns false when the ledger was already initialized.
    async fn mint_genesis(&self, account: &Address, supply: Amount) -> Result<bool>;
}
