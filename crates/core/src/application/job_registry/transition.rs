// Lifecycle transitions on existing jobs

use crate::domain::{Address, DomainError, JobEvent, JobId, Principal};
use crate::error::Result;
use crate::port::{JobRepositoryTransaction, TimeProvider, TransactionalJobRepository};

/// Transition requested against an existing job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// PENDING -> DELETED, refunds the owner
    Delete,
    /// PENDING -> ASSIGNED
    Assign,
    /// ASSIGNED -> COMPLETED
    Complete,
    /// COMPLETED -> ACCEPTED, pays the freelancer
    Accept,
}

impl Transition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Delete => "delete",
            Transition::Assign => "assign",
            Transition::Complete => "complete",
            Transition::Accept => "accept",
        }
    }
}

/// Execute a transition (validate -> mutate -> transfer -> record, one transaction)
pub async fn execute(
    store: &dyn TransactionalJobRepository,
    time_provider: &dyn TimeProvider,
    escrow: &Address,
    caller: &Principal,
    id: JobId,
    transition: Transition,
) -> Result<JobEvent> {
    let now = time_provider.now_millis();
    let mut tx = store.begin_transaction().await?;
    let outcome = apply(tx.as_mut(), now, escrow, caller, id, transition).await;

    super::finish(tx, outcome).await
}

async fn apply(
    tx: &mut dyn JobRepositoryTransaction,
    now: i64,
    escrow: &Address,
    caller: &Principal,
    id: JobId,
    transition: Transition,
) -> Result<JobEvent> {
    let mut job = tx
        .find_by_id(id)
        .await?
        .ok_or(DomainError::JobNotFound(id))?;
    let expected = job.status;

    let event = match transition {
        Transition::Delete => {
            job.delete(caller, now)?;
            tx.push_transfer(escrow, &job.owner, job.amount).await?;
            JobEvent::JobDeleted {
                id,
                owner: job.owner.clone(),
            }
        }
        Transition::Assign => {
            job.assign(caller, now)?;
            JobEvent::JobAssigned {
                id,
                freelancer: caller.address().clone(),
            }
        }
        Transition::Complete => {
            job.mark_complete(caller, now)?;
            JobEvent::MarkJobComplete {
                id,
                freelancer: caller.address().clone(),
            }
        }
        Transition::Accept => {
            let payee = job.accept(caller, now)?;
            tx.push_transfer(escrow, &payee, job.amount).await?;
            JobEvent::AcceptJob {
                id,
                freelancer: payee,
            }
        }
    };

    tx.update(&job, expected).await?;
    tx.append_event(&event, now).await?;

    Ok(event)
}
