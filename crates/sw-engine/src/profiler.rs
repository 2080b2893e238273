//! Normalizes raw item metadata into a [`SourceMediaProfile`].

use serde::{Deserialize, Serialize};
use sw_core::{AudioCodec, VideoCodec};

const DEFAULT_WIDTH: u32 = 1920;
const DEFAULT_HEIGHT: u32 = 1080;
const DEFAULT_BITRATE: u64 = 10_000_000;
const DEFAULT_FRAME_RATE: f64 = 24.0;

/// Already-extracted metadata for a media item. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemMetadata {
    #[serde(alias = "videoCodec")]
    pub video_codec: Option<String>,
    #[serde(alias = "audioCodec")]
    pub audio_codec: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bitrate: Option<u64>,
    #[serde(alias = "frameRate")]
    pub frame_rate: Option<f64>,
    #[serde(alias = "hasHDR", alias = "hasHdr")]
    pub has_hdr: Option<bool>,
    #[serde(alias = "hasSubtitles")]
    pub has_subtitles: Option<bool>,
}

/// Canonical encoding characteristics of a source asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMediaProfile {
    pub video_codec: VideoCodec,
    pub audio_codec: AudioCodec,
    pub width: u32,
    pub height: u32,
    pub bitrate: u64,
    pub frame_rate: f64,
    pub has_hdr: bool,
    pub has_subtitles: bool,
}

impl SourceMediaProfile {
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl Default for SourceMediaProfile {
    fn default() -> Self {
        Self {
            video_codec: VideoCodec::H264,
            audio_codec: AudioCodec::Aac,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            bitrate: DEFAULT_BITRATE,
            frame_rate: DEFAULT_FRAME_RATE,
            has_hdr: false,
            has_subtitles: false,
        }
    }
}

/// Turns [`ItemMetadata`] into a [`SourceMediaProfile`].
///
/// Total: missing, zero or unrecognized values fall back to a 1080p24
/// h264/aac SDR source at 10 Mbps.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceMediaProfiler;

impl SourceMediaProfiler {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, item: &ItemMetadata) -> SourceMediaProfile {
        let defaults = SourceMediaProfile::default();

        let video_codec = item
            .video_codec
            .as_deref()
            .and_then(|codec| match codec.parse::<VideoCodec>() {
                Ok(c) => Some(c),
                Err(e) => {
                    tracing::debug!(error = %e, "unrecognized source video codec");
                    None
                }
            })
            .unwrap_or(defaults.video_codec);

        let audio_codec = item
            .audio_codec
            .as_deref()
            .and_then(|codec| match codec.parse::<AudioCodec>() {
                Ok(c) => Some(c),
                Err(e) => {
                    tracing::debug!(error = %e, "unrecognized source audio codec");
                    None
                }
            })
            .unwrap_or(defaults.audio_codec);

        let frame_rate = item
            .frame_rate
            .filter(|fps| fps.is_finite() && *fps > 0.0)
            .unwrap_or(defaults.frame_rate);

        SourceMediaProfile {
            video_codec,
            audio_codec,
            width: item.width.filter(|w| *w > 0).unwrap_or(defaults.width),
            height: item.height.filter(|h| *h > 0).unwrap_or(defaults.height),
            bitrate: item.bitrate.filter(|b| *b > 0).unwrap_or(defaults.bitrate),
            frame_rate,
            has_hdr: item.has_hdr.unwrap_or(false),
            has_subtitles: item.has_subtitles.unwrap_or(false),
        }
    }
}
