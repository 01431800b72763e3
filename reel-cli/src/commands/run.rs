//! Run command handler
//!
//! Submits a job, waits for it, and downloads its primary output.

use std::path::Path;

use anyhow::Result;
use colored::*;
use reel_client::{ClientError, PollOptions, SieveClient};
use reel_core::dto::job::JobOptions;
use tokio_util::sync::CancellationToken;

use crate::output::print_raw_record;

pub async fn handle_run(
    client: &SieveClient,
    source_url: &str,
    output: &Path,
    options: JobOptions,
    poll: PollOptions,
    cancel: &CancellationToken,
) -> Result<()> {
    println!(
        "{} {} ({} {})",
        "Downloading".bold(),
        source_url.cyan(),
        options.resolution,
        options.output_extension()
    );

    match client.run(source_url, output, &options, &poll, cancel).await {
        Ok(outcome) => {
            println!("  Job:    {}", outcome.job_id.dimmed());
            println!("  Source: {}", outcome.output_url.dimmed());
            println!(
                "{} Saved {} bytes to {}",
                "✓".green(),
                outcome.bytes,
                outcome.path.display()
            );
            Ok(())
        }
        Err(ClientError::JobFailed { job_id, record }) => {
            println!("{} Job {} did not complete", "✗".red(), job_id);
            print_raw_record(&record);
            Err(ClientError::JobFailed { job_id, record }.into())
        }
        Err(e) => Err(e.into()),
    }
}
