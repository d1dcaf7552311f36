//! JobEscrow Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{
    ApproveResponse, BalanceResponse, CreateJobResponse, EventsResponse, JobEventResponse,
    JobView, StatsResponse,
};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;

/// JobEscrow daemon client
///
/// Every mutating call names the acting account explicitly.
///
/// # Example
///
/// ```no_run
/// use jobescrow_sdk::JobEscrowClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = JobEscrowClient::connect("http://127.0.0.1:9630").await?;
/// let job = client.get_job(1).await?;
/// println!("{} ({})", job.title, job.status);
/// # Ok(())
/// # }
/// ```
pub struct JobEscrowClient {
    client: HttpClient,
}

impl JobEscrowClient {
    /// Connect to the JobEscrow daemon
    ///
    /// # Arguments
    ///
    /// * `url` - RPC endpoint URL (e.g., `http://127.0.0.1:9630`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();

        let client = HttpClientBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .build(url)
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client })
    }

    /// Post a job as `caller`; the bounty moves into escrow
    ///
    /// Fails with code 4005 unless `caller` approved at least `amount`.
    pub async fn create_job(
        &self,
        caller: &str,
        title: &str,
        amount: u64,
    ) -> Result<CreateJobResponse> {
        self.call(
            "job.create.v1",
            json!({ "caller": caller, "title": title, "amount": amount }),
        )
        .await
    }

    /// Withdraw a PENDING job (owner only)
    pub async fn delete_job(&self, caller: &str, job_id: u64) -> Result<JobEventResponse> {
        self.job_action("job.delete.v1", caller, job_id).await
    }

    /// Claim a PENDING job
    pub async fn assign_job(&self, caller: &str, job_id: u64) -> Result<JobEventResponse> {
        self.job_action("job.assign.v1", caller, job_id).await
    }

    /// Report an ASSIGNED job done (assigned freelancer only)
    pub async fn complete_job(&self, caller: &str, job_id: u64) -> Result<JobEventResponse> {
        self.job_action("job.complete.v1", caller, job_id).await
    }

    /// Accept a COMPLETED job and pay the freelancer (owner only)
    pub async fn accept_job(&self, caller: &str, job_id: u64) -> Result<JobEventResponse> {
        self.job_action("job.accept.v1", caller, job_id).await
    }

    pub async fn get_job(&self, job_id: u64) -> Result<JobView> {
        self.call("job.get.v1", json!({ "job_id": job_id })).await
    }

    /// Event log, oldest first
    pub async fn events(&self, job_id: Option<u64>, limit: u32) -> Result<EventsResponse> {
        self.call("job.events.v1", json!({ "job_id": job_id, "limit": limit }))
            .await
    }

    pub async fn balance(&self, account: &str) -> Result<BalanceResponse> {
        self.call("ledger.balance.v1", json!({ "account": account }))
            .await
    }

    /// Set the allowance `caller` grants the escrow account
    pub async fn approve(&self, caller: &str, amount: u64) -> Result<ApproveResponse> {
        self.call(
            "ledger.approve.v1",
            json!({ "caller": caller, "amount": amount }),
        )
        .await
    }

    pub async fn stats(&self) -> Result<StatsResponse> {
        let response: StatsResponse = self.client.request("admin.stats.v1", rpc_params![]).await?;
        Ok(response)
    }

    async fn job_action(&self, method: &str, caller: &str, job_id: u64) -> Result<JobEventResponse> {
        self.call(method, json!({ "caller": caller, "job_id": job_id }))
            .await
    }

    async fn call<R: DeserializeOwned>(&self, method: &str, params: Value) -> Result<R> {
        let response: R = self.client.request(method, object_params(params)?).await?;
        Ok(response)
    }
}

/// Named params from a JSON object
fn object_params(value: Value) -> Result<ObjectParams> {
    let Value::Object(fields) = value else {
        return Err(SdkError::Other("params must be a JSON object".to_string()));
    };

    let mut params = ObjectParams::new();
    for (name, field) in fields {
        params.insert(&name, field)?;
    }
    Ok(params)
}
