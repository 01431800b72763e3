//! Job DTOs for the push endpoint

use serde::{Deserialize, Serialize};

/// Remote function every job is submitted to
pub const DOWNLOADER_FUNCTION: &str = "sieve/youtube-downloader";

/// Body of a push request
///
/// Built once per submission and never modified afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequest {
    pub function: String,
    pub inputs: JobInputs,
}

impl JobRequest {
    pub fn new(source_url: impl Into<String>, options: &JobOptions) -> Self {
        Self {
            function: DOWNLOADER_FUNCTION.to_string(),
            inputs: JobInputs {
                url: source_url.into(),
                options: options.clone(),
            },
        }
    }
}

/// `inputs` object of a push request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInputs {
    pub url: String,
    #[serde(flatten)]
    pub options: JobOptions,
}

/// Response of a push request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushResponse {
    #[serde(default)]
    pub id: Option<String>,
}

/// Recognised downloader options
///
/// `Default` yields the documented defaults: a 360p mp4 video with audio,
/// the full time range, and no metadata or subtitles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOptions {
    pub download_type: DownloadType,
    pub resolution: Resolution,
    pub include_audio: bool,
    /// Start of the clip in seconds
    pub start_time: u64,
    /// End of the clip in seconds, `-1` for the end of the source
    pub end_time: i64,
    pub include_metadata: bool,
    pub metadata_fields: Vec<String>,
    pub include_subtitles: bool,
    pub subtitle_languages: Vec<String>,
    pub video_format: VideoFormat,
    pub audio_format: AudioFormat,
    pub subtitle_format: SubtitleFormat,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            download_type: DownloadType::Video,
            resolution: Resolution::P360,
            include_audio: true,
            start_time: 0,
            end_time: -1,
            include_metadata: false,
            metadata_fields: Vec::new(),
            include_subtitles: false,
            subtitle_languages: Vec::new(),
            video_format: VideoFormat::Mp4,
            audio_format: AudioFormat::Mp3,
            subtitle_format: SubtitleFormat::Vtt,
        }
    }
}

impl JobOptions {
    /// Validates the option combination
    pub fn validate(&self) -> Result<(), String> {
        if self.end_time != -1 {
            if self.end_time < 0 {
                return Err(format!(
                    "end_time must be -1 or a positive offset, got {}",
                    self.end_time
                ));
            }
            if self.end_time as u64 <= self.start_time {
                return Err(format!(
                    "end_time ({}) must be greater than start_time ({})",
                    self.end_time, self.start_time
                ));
            }
        }

        Ok(())
    }

    /// File extension of the artifact these options produce
    pub fn output_extension(&self) -> &'static str {
        match self.download_type {
            DownloadType::Video => self.video_format.as_str(),
            DownloadType::Audio => self.audio_format.as_str(),
        }
    }
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(format!(
                        "unrecognised {} '{}', expected one of: {}",
                        stringify!($name),
                        s,
                        [$($value),+].join(", ")
                    )),
                }
            }
        }
    };
}

string_enum! {
    /// What the downloader extracts from the source
    DownloadType {
        Video => "video",
        Audio => "audio",
    }
}

string_enum! {
    /// Requested video resolution
    Resolution {
        HighestAvailable => "highest-available",
        LowestAvailable => "lowest-available",
        P1080 => "1080p",
        P720 => "720p",
        P480 => "480p",
        P360 => "360p",
        P240 => "240p",
        P144 => "144p",
    }
}

string_enum! {
    VideoFormat {
        Mp4 => "mp4",
        Webm => "webm",
    }
}

string_enum! {
    AudioFormat {
        Mp3 => "mp3",
        M4a => "m4a",
        Wav => "wav",
    }
}

string_enum! {
    SubtitleFormat {
        Vtt => "vtt",
        Srt => "srt",
    }
}
