//! Job command handlers
//!
//! Handles submitting a job, checking its status, and waiting for it.

use anyhow::{Context, Result};
use colored::*;
use reel_client::{ClientError, PollOptions, SieveClient};
use reel_core::dto::job::JobOptions;
use tokio_util::sync::CancellationToken;

use crate::output::{print_job_record, print_raw_record};

/// Submit a job and print its ID
pub async fn submit(
    client: &SieveClient,
    source_url: &str,
    options: JobOptions,
    cancel: &CancellationToken,
) -> Result<()> {
    let job_id = client
        .submit(source_url, &options, cancel)
        .await
        .context("Failed to submit job")?;

    println!("{} Submitted job {}", "✓".green(), job_id.cyan());
    Ok(())
}

/// Get and display the current record of a job
pub async fn status(client: &SieveClient, job_id: &str, cancel: &CancellationToken) -> Result<()> {
    let record = client
        .get_job(job_id, cancel)
        .await
        .with_context(|| format!("Failed to get job {}", job_id))?;

    print_job_record(job_id, &record);
    Ok(())
}

/// Wait for a job and display its final record
pub async fn wait(
    client: &SieveClient,
    job_id: &str,
    poll: PollOptions,
    cancel: &CancellationToken,
) -> Result<()> {
    println!(
        "{}",
        format!("Waiting for job {} (every {:?})...", job_id, poll.interval).dimmed()
    );

    match client.poll_until_terminal(job_id, &poll, cancel).await {
        Ok(record) => {
            print_job_record(job_id, &record);
            Ok(())
        }
        Err(ClientError::JobFailed { job_id, record }) => {
            print_job_record(&job_id, &record);
            print_raw_record(&record);
            Err(ClientError::JobFailed { job_id, record }.into())
        }
        Err(e) => Err(e.into()),
    }
}
