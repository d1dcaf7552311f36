// SQLite Escrow Ledger
//
// Balance arithmetic is done in Rust with checked operations; the helpers
// take a connection so the same code runs inside a lifecycle transaction
// and from the standalone ledger surface.

use crate::error::map_sqlx_error;
use crate::row::{from_db_amount, to_db_amount};
use async_trait::async_trait;
use jobescrow_core::domain::{Address, Amount, DomainError, Principal, MAX_AMOUNT};
use jobescrow_core::error::{AppError, Result};
use jobescrow_core::port::LedgerAccounts;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

pub(crate) async fn balance(conn: &mut SqliteConnection, account: &Address) -> Result<Amount> {
    let stored: Option<i64> = sqlx::query_scalar("SELECT balance FROM balances WHERE account = ?")
        .bind(account.as_str())
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

    stored.map(from_db_amount).transpose().map(|b| b.unwrap_or(0))
}

pub(crate) async fn allowance(
    conn: &mut SqliteConnection,
    owner: &Address,
    spender: &Address,
) -> Result<Amount> {
    let stored: Option<i64> =
        sqlx::query_scalar("SELECT amount FROM allowances WHERE owner = ? AND spender = ?")
            .bind(owner.as_str())
            .bind(spender.as_str())
            .fetch_optional(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;

    stored.map(from_db_amount).transpose().map(|a| a.unwrap_or(0))
}

async fn set_balance(conn: &mut SqliteConnection, account: &Address, value: Amount) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO balances (account, balance) VALUES (?, ?)
        ON CONFLICT (account) DO UPDATE SET balance = excluded.balance
        "#,
    )
    .bind(account.as_str())
    .bind(to_db_amount(value)?)
    .execute(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    Ok(())
}

async fn set_allowance(
    conn: &mut SqliteConnection,
    owner: &Address,
    spender: &Address,
    value: Amount,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO allowances (owner, spender, amount) VALUES (?, ?, ?)
        ON CONFLICT (owner, spender) DO UPDATE SET amount = excluded.amount
        "#,
    )
    .bind(owner.as_str())
    .bind(spender.as_str())
    .bind(to_db_amount(value)?)
    .execute(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    Ok(())
}

/// Move `amount` from `from` to `to`
pub(crate) async fn transfer(
    conn: &mut SqliteConnection,
    from: &Address,
    to: &Address,
    amount: Amount,
) -> Result<()> {
    let from_balance = balance(conn, from).await?;
    if from_balance < amount {
        return Err(DomainError::InsufficientFunds {
            account: from.to_string(),
            requested: amount,
            available: from_balance,
        }
        .into());
    }
    if from == to {
        return Ok(());
    }

    let to_balance = balance(conn, to).await?;
    let credited = to_balance
        .checked_add(amount)
        .filter(|b| *b <= MAX_AMOUNT)
        .ok_or_else(|| AppError::Validation(format!("balance overflow for {}", to)))?;

    set_balance(conn, from, from_balance - amount).await?;
    set_balance(conn, to, credited).await?;

    debug!(from = %from, to = %to, amount, "Ledger transfer");
    Ok(())
}

/// Spend `from`'s allowance toward `to_escrow` and move the funds
pub(crate) async fn pull(
    conn: &mut SqliteConnection,
    from: &Address,
    to_escrow: &Address,
    amount: Amount,
) -> Result<()> {
    let approved = allowance(conn, from, to_escrow).await?;
    let held = balance(conn, from).await?;

    if approved < amount || held < amount {
        return Err(DomainError::InsufficientFunds {
            account: from.to_string(),
            requested: amount,
            available: approved.min(held),
        }
        .into());
    }

    set_allowance(conn, from, to_escrow, approved - amount).await?;
    transfer(conn, from, to_escrow, amount).await
}

/// Ledger surface outside lifecycle transactions
pub struct SqliteLedger {
    pool: SqlitePool,
}

impl SqliteLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerAccounts for SqliteLedger {
    async fn balance_of(&self, account: &Address) -> Result<Amount> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        balance(&mut conn, account).await
    }

    async fn allowance(&self, owner: &Address, spender: &Address) -> Result<Amount> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        allowance(&mut conn, owner, spender).await
    }

    async fn approve(&self, owner: &Principal, spender: &Address, amount: Amount) -> Result<()> {
        if amount > MAX_AMOUNT {
            return Err(AppError::Validation(format!(
                "allowance {} exceeds maximum {}",
                amount, MAX_AMOUNT
            )));
        }

        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        set_allowance(&mut conn, owner.address(), spender, amount).await?;

        info!(owner = %owner, spender = %spender, amount, "Allowance approved");
        Ok(())
    }

    async fn mint_genesis(&self, account: &Address, supply: Amount) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let accounts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM balances")
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        if accounts > 0 {
            tx.rollback().await.map_err(map_sqlx_error)?;
            return Ok(false);
        }

        set_balance(&mut *tx, account, supply).await?;
        tx.commit().await.map_err(map_sqlx_error)?;

        info!(account = %account, supply, "Genesis supply minted");
        Ok(true)
    }
}
