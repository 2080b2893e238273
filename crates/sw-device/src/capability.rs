//! What a specific playback device can decode and display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sw_core::config::CapabilityDefaults;
use sw_core::{AudioCodec, Container, HardwareAcceleration, VideoCodec};

/// Cached description of a playback device's decode/display capabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceCapabilityProfile {
    pub device_id: String,
    pub supports_hevc: bool,
    pub supports_av1: bool,
    pub supports_hdr: bool,
    /// Maximum total video bitrate in bits per second.
    pub max_bitrate: u64,
    pub max_width: u32,
    pub max_height: u32,
    pub preferred_video_codec: VideoCodec,
    pub preferred_audio_codec: Option<AudioCodec>,
    pub preferred_container: Option<Container>,
    pub hardware_acceleration: HardwareAcceleration,
    /// When the capabilities were determined.
    pub last_analyzed: DateTime<Utc>,
}

impl DeviceCapabilityProfile {
    /// Build a profile for `device_id` from best-effort defaults, stamped now.
    pub fn from_defaults(device_id: impl Into<String>, defaults: &CapabilityDefaults) -> Self {
        Self {
            device_id: device_id.into(),
            supports_hevc: defaults.supports_hevc,
            supports_av1: defaults.supports_av1,
            supports_hdr: defaults.supports_hdr,
            max_bitrate: defaults.max_bitrate,
            max_width: defaults.max_width,
            max_height: defaults.max_height,
            preferred_video_codec: defaults.preferred_video_codec,
            preferred_audio_codec: defaults.preferred_audio_codec,
            preferred_container: defaults.preferred_container,
            hardware_acceleration: defaults.hardware_acceleration,
            last_analyzed: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_defaults_copies_every_field() {
        let defaults = CapabilityDefaults::default();
        let profile = DeviceCapabilityProfile::from_defaults("tv", &defaults);
        assert_eq!(profile.device_id, "tv");
        assert!(profile.supports_hevc);
        assert!(!profile.supports_av1);
        assert!(profile.supports_hdr);
        assert_eq!(profile.max_bitrate, 20_000_000);
        assert_eq!((profile.max_width, profile.max_height), (3840, 2160));
        assert_eq!(profile.preferred_video_codec, VideoCodec::H264);
        assert_eq!(profile.preferred_audio_codec, Some(AudioCodec::Aac));
        assert_eq!(profile.preferred_container, None);
        assert_eq!(profile.hardware_acceleration, HardwareAcceleration::Auto);
    }

    #[test]
    fn serializes_codecs_lowercase() {
        let profile = DeviceCapabilityProfile::from_defaults("tv", &CapabilityDefaults::default());
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["preferred_video_codec"], "h264");
        assert_eq!(json["hardware_acceleration"], "auto");
        assert!(json["preferred_container"].is_null());
    }
}
