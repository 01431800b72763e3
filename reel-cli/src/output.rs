//! Terminal output helpers

use colored::*;
use reel_core::domain::job::{JobRecord, JobStatus};

/// Print a job record
pub fn print_job_record(job_id: &str, record: &JobRecord) {
    println!("{}", "Job Details:".bold());
    println!("  ID:      {}", job_id.cyan());
    println!("  Status:  {}", colorize_status(&record.status));

    if let Some(error) = record.error_message() {
        println!("  Error:   {}", error.red());
    }

    if !record.outputs.is_empty() {
        println!("\n{}", "Outputs:".bold());
        for (index, output) in record.outputs.iter().enumerate() {
            let marker = if index == 0 { "▸".cyan() } else { "▹".dimmed() };
            match output.url() {
                Some(url) if !url.is_empty() => println!("  {} {}", marker, url),
                _ => println!("  {} {}", marker, "<no url>".dimmed()),
            }
        }
    }
}

/// Print the full record as JSON, for diagnosing failed jobs
pub fn print_raw_record(record: &JobRecord) {
    match serde_json::to_string_pretty(record) {
        Ok(pretty) => println!("{}", pretty.dimmed()),
        Err(_) => println!("{:?}", record),
    }
}

/// Colorize job status for display
pub fn colorize_status(status: &JobStatus) -> ColoredString {
    let status_str = status.to_string();
    match status {
        JobStatus::Queued => status_str.yellow(),
        JobStatus::Processing | JobStatus::Running => status_str.cyan(),
        JobStatus::Finished => status_str.green(),
        JobStatus::Failed | JobStatus::Error => status_str.red(),
        JobStatus::Other(_) => status_str.dimmed(),
    }
}
