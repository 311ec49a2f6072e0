//! Target streaming formats and the transcoder parameters for each.

use serde::Serialize;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;

/// HLS segment length in seconds.
pub const HLS_SEGMENT_SECONDS: u32 = 10;
/// DASH keyframe interval in frames.
pub const DASH_GOP_FRAMES: u32 = 60;
pub const DASH_VIDEO_BITRATE: &str = "1500k";
pub const DASH_AUDIO_BITRATE: &str = "128k";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamFormat {
    Hls,
    Dash,
}

impl StreamFormat {
    pub const ALL: [StreamFormat; 2] = [StreamFormat::Hls, StreamFormat::Dash];

    /// Subdirectory name under the video's output directory, also used in URLs.
    pub fn dir_name(self) -> &'static str {
        match self {
            StreamFormat::Hls => "hls",
            StreamFormat::Dash => "dash",
        }
    }

    /// The file whose presence marks the format as available.
    pub fn entry_file(self) -> &'static str {
        match self {
            StreamFormat::Hls => "playlist.m3u8",
            StreamFormat::Dash => "manifest.mpd",
        }
    }

    pub fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.dir_name() == name)
    }

    /// Transcoder arguments (without the program itself) reading `input`
    /// and writing the entry file `output`.
    pub fn transcoder_args(self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-i".into(), input.into()];
        let segment = HLS_SEGMENT_SECONDS.to_string();
        let gop = DASH_GOP_FRAMES.to_string();
        let x264 = format!("keyint={gop}:min-keyint={gop}:no-scenecut=1");
        let profile: Vec<&str> = match self {
            StreamFormat::Hls => [
                "-profile:v",
                "baseline",
                "-level",
                "3.0",
                "-start_number",
                "0",
                "-hls_time",
                segment.as_str(),
                "-hls_list_size",
                "0",
                "-f",
                "hls",
            ]
            .to_vec(),
            StreamFormat::Dash => [
                "-map",
                "0:v",
                "-map",
                "0:a",
                "-c:v",
                "libx264",
                "-x264-params",
                x264.as_str(),
                "-b:v:0",
                DASH_VIDEO_BITRATE,
                "-c:a",
                "aac",
                "-b:a",
                DASH_AUDIO_BITRATE,
                "-bf",
                "1",
                "-keyint_min",
                gop.as_str(),
                "-g",
                gop.as_str(),
                "-sc_threshold",
                "0",
                "-f",
                "dash",
                "-use_template",
                "1",
                "-use_timeline",
                "1",
                "-init_seg_name",
                "init-$RepresentationID$.m4s",
                "-media_seg_name",
                "chunk-$RepresentationID$-$Number%05d$.m4s",
                "-adaptation_sets",
                "id=0,streams=v id=1,streams=a",
            ]
            .to_vec(),
        };
        args.extend(profile.into_iter().map(OsString::from));
        args.push(output.into());
        args
    }
}

impl fmt::Display for StreamFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStatus {
    Done,
    Failed,
    TimedOut,
}

/// Outcome of one transcoder run. Never persisted.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub format: StreamFormat,
    pub status: ConversionStatus,
    /// Captured transcoder output, for server-side logs only.
    pub diagnostics: String,
}

impl ConversionResult {
    pub fn ok(&self) -> bool {
        self.status == ConversionStatus::Done
    }
}

/// Both conversions of a single upload.
#[derive(Debug, Clone)]
pub struct PackagingReport {
    pub hls: ConversionResult,
    pub dash: ConversionResult,
}

impl PackagingReport {
    pub fn is_success(&self) -> bool {
        self.hls.ok() && self.dash.ok()
    }
}
