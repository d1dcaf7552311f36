//! RPC Method Handlers
//!
//! Each method validates its string inputs, calls into the registry or the
//! ledger and converts the outcome to a response type.

use crate::error::{throttled, to_rpc_error};
use crate::rate_limiter::RateLimiter;
use crate::types::{
    ApproveParams, ApproveResponse, BalanceParams, BalanceResponse, CreateJobParams,
    CreateJobResponse, EventsParams, EventsResponse, GetJobParams, JobActionParams,
    JobEventResponse, JobView, StatsResponse, MAX_EVENT_LIMIT,
};
use jobescrow_core::application::{CreateJobRequest, EscrowAuditor, JobRegistry};
use jobescrow_core::domain::{Address, DomainError, JobEvent, JobStatus, Principal};
use jobescrow_core::error::AppError;
use jobescrow_core::port::{JobRepository, LedgerAccounts};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use std::time::Instant;

type RpcResult<T> = Result<T, ErrorObjectOwned>;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    registry: Arc<JobRegistry>,
    job_repo: Arc<dyn JobRepository>,
    ledger: Arc<dyn LedgerAccounts>,
    auditor: EscrowAuditor,
    rate_limiter: RateLimiter,
    start_time: Instant,
}

impl RpcHandler {
    pub fn new(
        registry: Arc<JobRegistry>,
        job_repo: Arc<dyn JobRepository>,
        ledger: Arc<dyn LedgerAccounts>,
        rate_limiter: RateLimiter,
    ) -> Self {
        let auditor = EscrowAuditor::new(registry.clone(), job_repo.clone(), ledger.clone());
        Self {
            registry,
            job_repo,
            ledger,
            auditor,
            rate_limiter,
            start_time: Instant::now(),
        }
    }

    /// job.create.v1
    pub async fn create_job(&self, params: CreateJobParams) -> RpcResult<CreateJobResponse> {
        self.throttle()?;
        let caller = principal(params.caller)?;

        let event = self
            .registry
            .create_job(&caller, CreateJobRequest::new(params.title, params.amount))
            .await
            .map_err(to_rpc_error)?;

        match event {
            JobEvent::JobCreated { id, owner, amount } => Ok(CreateJobResponse {
                job_id: id,
                owner: owner.into(),
                amount,
                status: JobStatus::Pending,
            }),
            other => Err(to_rpc_error(AppError::Internal(format!(
                "create produced {}",
                other.name()
            )))),
        }
    }

    /// job.delete.v1
    pub async fn delete_job(&self, params: JobActionParams) -> RpcResult<JobEventResponse> {
        self.throttle()?;
        let caller = principal(params.caller)?;
        let event = self.registry.delete_job(&caller, params.job_id).await;
        event.map(Into::into).map_err(to_rpc_error)
    }

    /// job.assign.v1
    pub async fn assign_job(&self, params: JobActionParams) -> RpcResult<JobEventResponse> {
        self.throttle()?;
        let caller = principal(params.caller)?;
        let event = self.registry.assign_job(&caller, params.job_id).await;
        event.map(Into::into).map_err(to_rpc_error)
    }

    /// job.complete.v1
    pub async fn complete_job(&self, params: JobActionParams) -> RpcResult<JobEventResponse> {
        self.throttle()?;
        let caller = principal(params.caller)?;
        let event = self.registry.mark_job_complete(&caller, params.job_id).await;
        event.map(Into::into).map_err(to_rpc_error)
    }

    /// job.accept.v1
    pub async fn accept_job(&self, params: JobActionParams) -> RpcResult<JobEventResponse> {
        self.throttle()?;
        let caller = principal(params.caller)?;
        let event = self.registry.accept_job(&caller, params.job_id).await;
        event.map(Into::into).map_err(to_rpc_error)
    }

    /// job.get.v1
    pub async fn get_job(&self, params: GetJobParams) -> RpcResult<JobView> {
        let job = self
            .job_repo
            .find_by_id(params.job_id)
            .await
            .map_err(to_rpc_error)?
            .ok_or_else(|| to_rpc_error(DomainError::JobNotFound(params.job_id).into()))?;

        Ok(job.into())
    }

    /// job.events.v1
    pub async fn events(&self, params: EventsParams) -> RpcResult<EventsResponse> {
        let limit = params.limit.min(MAX_EVENT_LIMIT);
        let events = self
            .job_repo
            .list_events(params.job_id, limit)
            .await
            .map_err(to_rpc_error)?;

        Ok(EventsResponse { events })
    }

    /// ledger.balance.v1
    pub async fn balance(&self, params: BalanceParams) -> RpcResult<BalanceResponse> {
        let account = address(params.account)?;
        let balance = self
            .ledger
            .balance_of(&account)
            .await
            .map_err(to_rpc_error)?;

        Ok(BalanceResponse {
            account: account.into(),
            balance,
        })
    }

    /// ledger.approve.v1
    pub async fn approve(&self, params: ApproveParams) -> RpcResult<ApproveResponse> {
        self.throttle()?;
        let caller = principal(params.caller)?;
        let escrow = self.registry.escrow_account();
        if caller.is(escrow) {
            return Err(to_rpc_error(
                DomainError::ValidationError("escrow account cannot approve itself".to_string())
                    .into(),
            ));
        }

        self.ledger
            .approve(&caller, escrow, params.amount)
            .await
            .map_err(to_rpc_error)?;

        Ok(ApproveResponse {
            owner: caller.address().to_string(),
            spender: escrow.to_string(),
            allowance: params.amount,
        })
    }

    /// admin.stats.v1
    pub async fn stats(&self) -> RpcResult<StatsResponse> {
        let audit = self.auditor.audit().await.map_err(to_rpc_error)?;
        let job_count = self.job_repo.job_count().await.map_err(to_rpc_error)?;

        let mut counts = [0i64; 5];
        for (slot, status) in counts.iter_mut().zip(JobStatus::ALL) {
            *slot = self
                .job_repo
                .count_by_status(status)
                .await
                .map_err(to_rpc_error)?;
        }
        let [pending, assigned, completed, accepted, deleted] = counts;

        Ok(StatsResponse {
            job_count,
            pending_jobs: pending,
            assigned_jobs: assigned,
            completed_jobs: completed,
            accepted_jobs: accepted,
            deleted_jobs: deleted,
            escrow_account: self.registry.escrow_account().to_string(),
            escrow_balance: audit.escrow_balance,
            outstanding: audit.outstanding,
            escrow_consistent: audit.consistent,
            uptime_seconds: self.start_time.elapsed().as_secs(),
        })
    }

    fn throttle(&self) -> RpcResult<()> {
        if self.rate_limiter.try_acquire() {
            Ok(())
        } else {
            Err(throttled())
        }
    }
}

fn address(raw: String) -> RpcResult<Address> {
    Address::parse(raw).map_err(|e| to_rpc_error(e.into()))
}

fn principal(raw: String) -> RpcResult<Principal> {
    address(raw).map(Principal::new)
}
