//! Named encoding parameter bundles offered as one-step configuration
//! shortcuts.

use serde::{Deserialize, Serialize};

use crate::media::{AudioCodec, VideoCodec};
use crate::{Error, Result};

/// A named bundle of encoding parameters. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscodingPreset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Video bitrate in bits per second.
    pub video_bitrate: u64,
    /// Audio bitrate in bits per second.
    pub audio_bitrate: u64,
    pub video_codec: VideoCodec,
    pub audio_codec: AudioCodec,
    /// Encoder profile (e.g. "high", "main").
    pub profile: String,
    /// Encoder level (e.g. "4.1").
    pub level: String,
}

impl TranscodingPreset {
    /// Reject presets that could never be addressed or displayed.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation("preset id is required".into()));
        }
        if self.name.trim().is_empty() {
            return Err(Error::Validation(format!(
                "preset '{}' has no name",
                self.id
            )));
        }
        Ok(())
    }

    /// The four presets every store starts with.
    pub fn builtin() -> Vec<TranscodingPreset> {
        vec![
            TranscodingPreset {
                id: "high-quality".into(),
                name: "High Quality".into(),
                description: "Maximum quality for local network playback".into(),
                video_bitrate: 20_000_000,
                audio_bitrate: 320_000,
                video_codec: VideoCodec::H264,
                audio_codec: AudioCodec::Aac,
                profile: "high".into(),
                level: "5.1".into(),
            },
            TranscodingPreset {
                id: "balanced".into(),
                name: "Balanced".into(),
                description: "Good quality at a moderate bitrate".into(),
                video_bitrate: 8_000_000,
                audio_bitrate: 192_000,
                video_codec: VideoCodec::H264,
                audio_codec: AudioCodec::Aac,
                profile: "main".into(),
                level: "4.1".into(),
            },
            TranscodingPreset {
                id: "mobile".into(),
                name: "Mobile Optimized".into(),
                description: "Low bitrate for cellular connections".into(),
                video_bitrate: 2_000_000,
                audio_bitrate: 128_000,
                video_codec: VideoCodec::H264,
                audio_codec: AudioCodec::Aac,
                profile: "baseline".into(),
                level: "3.1".into(),
            },
            TranscodingPreset {
                id: "hevc-efficient".into(),
                name: "HEVC Efficient".into(),
                description: "HEVC encoding for bandwidth savings".into(),
                video_bitrate: 6_000_000,
                audio_bitrate: 192_000,
                video_codec: VideoCodec::Hevc,
                audio_codec: AudioCodec::Aac,
                profile: "main".into(),
                level: "5.0".into(),
            },
        ]
    }
}
