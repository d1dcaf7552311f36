// Job Registry - lifecycle state machine with escrow orchestration

pub mod create;
pub mod transition;


pub use create::CreateJobRequest;
pub use transition::Transition;

use crate::domain::{Address, DomainError, JobEvent, JobId, Principal};
use crate::error::Result;
use crate::port::{JobRepositoryTransaction, TimeProvider, TransactionalJobRepository};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, MutexGuard};
use tracing::{info, warn};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Job Registry
///
/// Every operation runs to completion under a single serialization lock:
/// validate, mutate, move funds, record the event, commit. A rejected
/// operation rolls back and leaves jobs and balances untouched.
pub struct JobRegistry {
    store: Arc<dyn TransactionalJobRepository>,
    time_provider: Arc<dyn TimeProvider>,
    escrow_account: Address,
    serial: Mutex<()>,
    events: broadcast::Sender<JobEvent>,
}

impl JobRegistry {
    pub fn new(
        store: Arc<dyn TransactionalJobRepository>,
        time_provider: Arc<dyn TimeProvider>,
        escrow_account: Address,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            time_provider,
            escrow_account,
            serial: Mutex::new(()),
            events,
        }
    }

    /// Account holding all escrowed bounties
    pub fn escrow_account(&self) -> &Address {
        &self.escrow_account
    }

    /// Receive events of committed transitions
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.events.subscribe()
    }

    /// Hold off lifecycle operations while the guard lives (consistent reads)
    pub async fn quiesce(&self) -> MutexGuard<'_, ()> {
        self.serial.lock().await
    }

    /// createJob: pull `amount` into escrow and record a PENDING job
    pub async fn create_job(&self, caller: &Principal, req: CreateJobRequest) -> Result<JobEvent> {
        self.ensure_caller(caller)?;
        let _serial = self.serial.lock().await;

        let outcome = create::execute(
            self.store.as_ref(),
            self.time_provider.as_ref(),
            &self.escrow_account,
            caller,
            req,
        )
        .await;

        self.publish("create", caller, outcome)
    }

    /// deleteJob: owner withdraws a PENDING job, bounty returns to owner
    pub async fn delete_job(&self, caller: &Principal, id: JobId) -> Result<JobEvent> {
        self.transition(caller, id, Transition::Delete).await
    }

    /// jobAssignment: caller claims a PENDING job
    pub async fn assign_job(&self, caller: &Principal, id: JobId) -> Result<JobEvent> {
        self.transition(caller, id, Transition::Assign).await
    }

    /// markJobComplete: assigned freelancer reports the work done
    pub async fn mark_job_complete(&self, caller: &Principal, id: JobId) -> Result<JobEvent> {
        self.transition(caller, id, Transition::Complete).await
    }

    /// acceptJob: owner accepts COMPLETED work, bounty goes to the freelancer
    pub async fn accept_job(&self, caller: &Principal, id: JobId) -> Result<JobEvent> {
        self.transition(caller, id, Transition::Accept).await
    }

    async fn transition(
        &self,
        caller: &Principal,
        id: JobId,
        transition: Transition,
    ) -> Result<JobEvent> {
        self.ensure_caller(caller)?;
        let _serial = self.serial.lock().await;

        let outcome = transition::execute(
            self.store.as_ref(),
            self.time_provider.as_ref(),
            &self.escrow_account,
            caller,
            id,
            transition,
        )
        .await;

        self.publish(transition.as_str(), caller, outcome)
    }

    fn ensure_caller(&self, caller: &Principal) -> Result<()> {
        if caller.is(&self.escrow_account) {
            return Err(DomainError::ValidationError(
                "escrow account cannot act as a caller".to_string(),
            )
            .into());
        }
        Ok(())
    }

    fn publish(
        &self,
        operation: &str,
        caller: &Principal,
        outcome: Result<JobEvent>,
    ) -> Result<JobEvent> {
        match outcome {
            Ok(event) => {
                info!(
                    job_id = event.job_id(),
                    event = event.name(),
                    caller = %caller,
                    "Lifecycle transition committed"
                );
                // No subscribers is fine
                let _ = self.events.send(event.clone());
                Ok(event)
            }
            Err(e) => {
                warn!(operation, caller = %caller, error = %e, "Lifecycle operation rejected");
                Err(e)
            }
        }
    }
}

/// Commit on success, roll back on rejection (the original error wins)
async fn finish(
    tx: Box<dyn JobRepositoryTransaction>,
    outcome: Result<JobEvent>,
) -> Result<JobEvent> {
    match outcome {
        Ok(event) => {
            tx.commit().await?;
            Ok(event)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            Err(e)
        }
    }
}
