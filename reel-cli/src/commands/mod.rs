//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod fetch;
mod job;
mod run;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use reel_client::PollOptions;
use reel_core::dto::job::{
    AudioFormat, DownloadType, JobOptions, Resolution, SubtitleFormat, VideoFormat,
};
use tokio_util::sync::CancellationToken;

use crate::config::Config;

/// Default destination of a download
pub const DEFAULT_OUTPUT: &str = "downloaded_video.mp4";

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit a job, wait for it, and download the result
    Run {
        /// URL of the source video
        source_url: String,

        /// Where to save the downloaded file
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        #[command(flatten)]
        options: JobOptionArgs,

        #[command(flatten)]
        poll: PollArgs,
    },
    /// Submit a job and print its ID
    Submit {
        /// URL of the source video
        source_url: String,

        #[command(flatten)]
        options: JobOptionArgs,
    },
    /// Show the current status of a job
    Status {
        /// Job ID
        job_id: String,
    },
    /// Wait for a job to reach a terminal state
    Wait {
        /// Job ID
        job_id: String,

        #[command(flatten)]
        poll: PollArgs,
    },
    /// Download a file
    Fetch {
        /// URL of the file
        url: String,

        /// Where to save the downloaded file
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },
}

/// Downloader options, defaulting to a 360p mp4 with audio
#[derive(Args, Debug, Clone)]
pub struct JobOptionArgs {
    /// What to download
    #[arg(long, default_value_t = DownloadType::Video)]
    download_type: DownloadType,

    /// Video resolution
    #[arg(long, default_value_t = Resolution::P360)]
    resolution: Resolution,

    /// Drop the audio track
    #[arg(long)]
    no_audio: bool,

    /// Start of the clip in seconds
    #[arg(long, default_value_t = 0)]
    start_time: u64,

    /// End of the clip in seconds, -1 for the end of the video
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    end_time: i64,

    /// Include source metadata
    #[arg(long)]
    metadata: bool,

    /// Metadata field to include (repeatable)
    #[arg(long = "metadata-field")]
    metadata_fields: Vec<String>,

    /// Include subtitles
    #[arg(long)]
    subtitles: bool,

    /// Subtitle language to include (repeatable)
    #[arg(long = "subtitle-language")]
    subtitle_languages: Vec<String>,

    #[arg(long, default_value_t = VideoFormat::Mp4)]
    video_format: VideoFormat,

    #[arg(long, default_value_t = AudioFormat::Mp3)]
    audio_format: AudioFormat,

    #[arg(long, default_value_t = SubtitleFormat::Vtt)]
    subtitle_format: SubtitleFormat,
}

impl JobOptionArgs {
    pub fn into_options(self) -> Result<JobOptions> {
        let options = JobOptions {
            download_type: self.download_type,
            resolution: self.resolution,
            include_audio: !self.no_audio,
            start_time: self.start_time,
            end_time: self.end_time,
            include_metadata: self.metadata,
            metadata_fields: self.metadata_fields,
            include_subtitles: self.subtitles,
            subtitle_languages: self.subtitle_languages,
            video_format: self.video_format,
            audio_format: self.audio_format,
            subtitle_format: self.subtitle_format,
        };

        if let Err(e) = options.validate() {
            bail!("Invalid job options: {}", e);
        }

        Ok(options)
    }
}

/// Poll loop settings
#[derive(Args, Debug, Clone, Copy)]
pub struct PollArgs {
    /// Seconds between status requests
    #[arg(long, default_value_t = 5)]
    interval: u64,

    /// Seconds to wait for the job before giving up, 0 to wait forever
    #[arg(long, default_value_t = 1800)]
    max_wait: u64,
}

impl PollArgs {
    pub fn into_options(self) -> Result<PollOptions> {
        if self.interval == 0 {
            bail!("--interval must be greater than 0");
        }

        let max_wait = (self.max_wait > 0).then(|| Duration::from_secs(self.max_wait));
        Ok(PollOptions::new(Duration::from_secs(self.interval)).with_max_wait(max_wait))
    }
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(
    command: Commands,
    config: &Config,
    cancel: &CancellationToken,
) -> Result<()> {
    match command {
        Commands::Run {
            source_url,
            output,
            options,
            poll,
        } => {
            run::handle_run(
                &config.api_client()?,
                &source_url,
                &output,
                options.into_options()?,
                poll.into_options()?,
                cancel,
            )
            .await
        }
        Commands::Submit {
            source_url,
            options,
        } => {
            job::submit(&config.api_client()?, &source_url, options.into_options()?, cancel).await
        }
        Commands::Status { job_id } => job::status(&config.api_client()?, &job_id, cancel).await,
        Commands::Wait { job_id, poll } => {
            job::wait(&config.api_client()?, &job_id, poll.into_options()?, cancel).await
        }
        Commands::Fetch { url, output } => {
            fetch::handle_fetch(&config.download_client()?, &url, &output, cancel).await
        }
    }
}
