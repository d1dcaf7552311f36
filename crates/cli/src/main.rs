//! JobEscrow CLI - Command-line interface for the JobEscrow daemon

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9630";

#[derive(Parser)]
#[command(name = "jobescrow")]
#[command(about = "JobEscrow job marketplace CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "JOBESCROW_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,

    /// Account to act as
    #[arg(long = "as", env = "JOBESCROW_CALLER", global = true)]
    caller: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Post a job; the bounty moves into escrow
    Create {
        /// Bounty amount
        amount: u64,

        /// Job title
        #[arg(short, long, default_value = "")]
        title: String,
    },

    /// Withdraw a pending job and get the bounty back
    Delete { job_id: u64 },

    /// Claim a pending job as freelancer
    Assign { job_id: u64 },

    /// Report an assigned job as done
    Complete { job_id: u64 },

    /// Accept completed work and release the bounty
    Accept { job_id: u64 },

    /// Show a job
    Show { job_id: u64 },

    /// List lifecycle events
    Events {
        /// Only events of this job
        #[arg(long)]
        job: Option<u64>,

        #[arg(short = 'n', long, default_value = "50")]
        limit: u32,
    },

    /// Allow the escrow account to pull up to AMOUNT from you
    Approve { amount: u64 },

    /// Ledger balance (defaults to --as)
    Balance { account: Option<String> },

    /// Show daemon status and escrow audit
    Status,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize, Tabled)]
struct JobRow {
    job_id: u64,
    title: String,
    amount: u64,
    owner: String,
    #[tabled(display_with = "display_freelancer")]
    freelancer: Option<String>,
    status: String,
}

fn display_freelancer(freelancer: &Option<String>) -> String {
    freelancer.clone().unwrap_or_else(|| "-".to_string())
}

#[derive(Deserialize, Tabled)]
struct EventRow {
    seq: i64,
    job_id: u64,
    #[tabled(display_with = "display_event")]
    event: serde_json::Value,
    recorded_at: i64,
}

fn display_event(event: &serde_json::Value) -> String {
    let name = event["event"].as_str().unwrap_or("?");
    let account = event
        .get("freelancer")
        .or_else(|| event.get("owner"))
        .and_then(|v| v.as_str())
        .unwrap_or("");
    match event.get("amount") {
        Some(amount) => format!("{} {} {}", name, account, amount),
        None => format!("{} {}", name, account),
    }
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

fn require_caller(caller: &Option<String>) -> Result<&str> {
    caller
        .as_deref()
        .context("No caller given: pass --as ADDRESS or set JOBESCROW_CALLER")
}

async fn transition(cli: &Cli, method: &str, job_id: u64, done: &str) -> Result<()> {
    let caller = require_caller(&cli.caller)?;
    let result = call_rpc(
        &cli.rpc_url,
        method,
        json!({ "caller": caller, "job_id": job_id }),
    )
    .await?;

    println!(
        "{} {} (event {}, status {})",
        "✓".green().bold(),
        format!("Job {} {}", job_id, done).bold(),
        result["event"].as_str().unwrap_or("?"),
        result["status"].as_str().unwrap_or("?")
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Create { amount, title } => {
            let caller = require_caller(&cli.caller)?;
            let params = json!({
                "caller": caller,
                "title": title,
                "amount": amount,
            });

            let result = call_rpc(&cli.rpc_url, "job.create.v1", params).await?;

            println!("{}", "✓ Job created".green().bold());
            println!("  {} {}", "Job ID:".bold(), result["job_id"]);
            println!("  {} {}", "Escrowed:".bold(), result["amount"]);
        }

        Commands::Delete { job_id } => {
            transition(&cli, "job.delete.v1", *job_id, "deleted").await?;
        }

        Commands::Assign { job_id } => {
            transition(&cli, "job.assign.v1", *job_id, "assigned").await?;
        }

        Commands::Complete { job_id } => {
            transition(&cli, "job.complete.v1", *job_id, "marked complete").await?;
        }

        Commands::Accept { job_id } => {
            transition(&cli, "job.accept.v1", *job_id, "accepted").await?;
        }

        Commands::Show { job_id } => {
            let result = call_rpc(&cli.rpc_url, "job.get.v1", json!({ "job_id": job_id })).await?;
            let job: JobRow = serde_json::from_value(result)?;

            println!("{}", Table::new(vec![job]));
        }

        Commands::Events { job, limit } => {
            let result = call_rpc(
                &cli.rpc_url,
                "job.events.v1",
                json!({ "job_id": job, "limit": limit }),
            )
            .await?;
            let events: Vec<EventRow> = serde_json::from_value(result["events"].clone())?;

            if events.is_empty() {
                println!("{}", "No events".yellow());
            } else {
                println!("{}", Table::new(events));
            }
        }

        Commands::Approve { amount } => {
            let caller = require_caller(&cli.caller)?;
            let result = call_rpc(
                &cli.rpc_url,
                "ledger.approve.v1",
                json!({ "caller": caller, "amount": amount }),
            )
            .await?;

            println!(
                "{} {} may pull up to {} from {}",
                "✓".green().bold(),
                result["spender"].as_str().unwrap_or("escrow"),
                result["allowance"],
                caller
            );
        }

        Commands::Balance { account } => {
            let account = match account {
                Some(account) => account.as_str(),
                None => require_caller(&cli.caller)?,
            };
            let result = call_rpc(
                &cli.rpc_url,
                "ledger.balance.v1",
                json!({ "account": account }),
            )
            .await?;

            println!("  {} {}", format!("{}:", account).bold(), result["balance"]);
        }

        Commands::Status => {
            println!("{}", "System Status".cyan().bold());
            println!();

            match call_rpc(&cli.rpc_url, "admin.stats.v1", json!({})).await {
                Ok(stats) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!();
                    println!("  {} {}", "Jobs Created:".bold(), stats["job_count"]);
                    println!("  {} {}", "Pending:".bold(), stats["pending_jobs"]);
                    println!("  {} {}", "Assigned:".bold(), stats["assigned_jobs"]);
                    println!("  {} {}", "Completed:".bold(), stats["completed_jobs"]);
                    println!("  {} {}", "Accepted:".bold(), stats["accepted_jobs"]);
                    println!("  {} {}", "Deleted:".bold(), stats["deleted_jobs"]);
                    println!();
                    println!(
                        "  {} {} (escrow {}, outstanding {})",
                        "Escrow Audit:".bold(),
                        if stats["escrow_consistent"].as_bool().unwrap_or(false) {
                            "OK".green()
                        } else {
                            "MISMATCH".red()
                        },
                        stats["escrow_balance"],
                        stats["outstanding"]
                    );
                    println!("  {} {} seconds", "Uptime:".bold(), stats["uptime_seconds"]);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}
