//! Fetch command handler

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use reel_client::SieveClient;
use tokio_util::sync::CancellationToken;

/// Download a single file
pub async fn handle_fetch(
    client: &SieveClient,
    url: &str,
    output: &Path,
    cancel: &CancellationToken,
) -> Result<()> {
    let bytes = client
        .fetch_to_file(url, output, cancel)
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    println!(
        "{} Saved {} bytes to {}",
        "✓".green(),
        bytes,
        output.display()
    );
    Ok(())
}
