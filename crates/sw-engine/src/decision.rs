//! The transcoding decision rules.
//!
//! [`DecisionEngine::decide`] is a pure function of its four inputs: the same
//! arguments always produce the same [`TranscodingProfile`].

use serde::{Deserialize, Serialize};
use sw_core::{
    AudioCodec, Container, EncodingContext, ProfileType, StreamProtocol, TranscodeSeekInfo,
    VideoCodec,
};
use sw_device::DeviceCapabilityProfile;

use crate::profiler::SourceMediaProfile;

/// Ceiling on the audio bitrate of any decision.
pub const MAX_AUDIO_BITRATE: u64 = 320_000;

/// Audio never takes more than this fraction (1/n) of the device bitrate.
const AUDIO_BITRATE_DIVISOR: u64 = 20;

/// Output audio is always stereo.
const AUDIO_CHANNELS: u32 = 2;

/// Sources at least this wide are encoded with HEVC when the device allows.
const UHD_WIDTH: u32 = 3840;

/// Pixel-count tiers: (inclusive upper bound, bitrate).
const BITRATE_TIERS: [(u64, u64); 3] = [
    (921_600, 2_000_000),    // up to 1280x720
    (2_073_600, 5_000_000),  // up to 1920x1080
    (3_840_000, 10_000_000), // up to 2560x1500
];

const TOP_TIER_BITRATE: u64 = 20_000_000;

/// Per-request constraints supplied by the client starting playback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodingRequest {
    pub device_id: String,
    /// Client bitrate cap in bits per second; `0` means no cap.
    pub max_bitrate: u64,
    pub preferred_codec: Option<VideoCodec>,
    pub enable_hardware_acceleration: bool,
}

impl TranscodingRequest {
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            ..Self::default()
        }
    }

    pub fn with_max_bitrate(mut self, max_bitrate: u64) -> Self {
        self.max_bitrate = max_bitrate;
        self
    }
}

/// Container names a device declares it can play.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceFormatSupport {
    containers: Vec<String>,
}

impl DeviceFormatSupport {
    pub fn new<I, S>(containers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            containers: containers.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma-separated list such as `"mp4,mkv"`.
    pub fn from_csv(list: &str) -> Self {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        )
    }

    /// Case-insensitive membership check.
    pub fn supports(&self, container: &str) -> bool {
        self.containers
            .iter()
            .any(|c| c.trim().eq_ignore_ascii_case(container))
    }

    pub fn containers(&self) -> &[String] {
        &self.containers
    }
}

/// The parameters chosen for one transcoding session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscodingProfile {
    pub container: Container,
    pub video_codec: VideoCodec,
    pub audio_codec: AudioCodec,
    pub video_bitrate: u64,
    pub audio_bitrate: u64,
    pub audio_channels: u32,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub max_framerate: f64,
    #[serde(rename = "type")]
    pub profile_type: ProfileType,
    pub context: EncodingContext,
    pub protocol: StreamProtocol,
    pub transcode_seek_info: TranscodeSeekInfo,
    pub copy_timestamps: bool,
    pub enable_subtitles_in_manifest: bool,
}

/// Bitrate for a source of `pixel_count` pixels before any codec discount
/// or clamping.
pub fn base_video_bitrate(pixel_count: u64) -> u64 {
    BITRATE_TIERS
        .iter()
        .find(|(limit, _)| pixel_count <= *limit)
        .map_or(TOP_TIER_BITRATE, |(_, bitrate)| *bitrate)
}

/// Stateless rule engine turning resolved inputs into a [`TranscodingProfile`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionEngine;

impl DecisionEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn decide(
        &self,
        source: &SourceMediaProfile,
        device: &DeviceCapabilityProfile,
        formats: &DeviceFormatSupport,
        request: &TranscodingRequest,
    ) -> TranscodingProfile {
        let container = select_container(device, formats);
        let video_codec = select_video_codec(source, device);
        let audio_codec = select_audio_codec(source, device);
        let video_bitrate = clamp_bitrate(
            discounted_bitrate(base_video_bitrate(source.pixel_count()), video_codec),
            request,
            device,
        );
        let audio_bitrate = MAX_AUDIO_BITRATE.min(device.max_bitrate / AUDIO_BITRATE_DIVISOR);

        let exceeds_device = source.width > device.max_width || source.height > device.max_height;
        let (max_width, max_height) = if exceeds_device {
            (Some(device.max_width), Some(device.max_height))
        } else {
            (None, None)
        };

        tracing::debug!(
            device_id = %device.device_id,
            %container,
            %video_codec,
            %audio_codec,
            video_bitrate,
            audio_bitrate,
            hw_accel = request.enable_hardware_acceleration,
            "transcoding decision made"
        );

        TranscodingProfile {
            container,
            video_codec,
            audio_codec,
            video_bitrate,
            audio_bitrate,
            audio_channels: AUDIO_CHANNELS,
            max_width,
            max_height,
            max_framerate: source.frame_rate,
            profile_type: ProfileType::Video,
            context: EncodingContext::Streaming,
            protocol: StreamProtocol::Http,
            transcode_seek_info: TranscodeSeekInfo::Auto,
            copy_timestamps: false,
            enable_subtitles_in_manifest: true,
        }
    }
}

fn select_container(device: &DeviceCapabilityProfile, formats: &DeviceFormatSupport) -> Container {
    if formats.supports("mp4") {
        Container::Mp4
    } else {
        device.preferred_container.unwrap_or(Container::Mkv)
    }
}

fn select_video_codec(source: &SourceMediaProfile, device: &DeviceCapabilityProfile) -> VideoCodec {
    if device.supports_hevc && source.width >= UHD_WIDTH {
        VideoCodec::Hevc
    } else if device.supports_av1 && device.preferred_video_codec == VideoCodec::Av1 {
        VideoCodec::Av1
    } else {
        VideoCodec::H264
    }
}

fn select_audio_codec(source: &SourceMediaProfile, device: &DeviceCapabilityProfile) -> AudioCodec {
    if source.audio_codec.requires_downmix() {
        AudioCodec::Ac3
    } else {
        device.preferred_audio_codec.unwrap_or(AudioCodec::Aac)
    }
}

/// HEVC gets a 30% efficiency discount, truncated.
fn discounted_bitrate(base: u64, codec: VideoCodec) -> u64 {
    match codec {
        VideoCodec::Hevc => base * 7 / 10,
        VideoCodec::H264 | VideoCodec::Av1 | VideoCodec::Vp9 => base,
    }
}

/// Request cap first (when set), then the device cap.
fn clamp_bitrate(
    bitrate: u64,
    request: &TranscodingRequest,
    device: &DeviceCapabilityProfile,
) -> u64 {
    let bitrate = if request.max_bitrate > 0 {
        bitrate.min(request.max_bitrate)
    } else {
        bitrate
    };
    bitrate.min(device.max_bitrate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sw_core::config::CapabilityDefaults;

    fn source(width: u32, height: u32) -> SourceMediaProfile {
        SourceMediaProfile {
            width,
            height,
            ..SourceMediaProfile::default()
        }
    }

    fn device() -> DeviceCapabilityProfile {
        DeviceCapabilityProfile::from_defaults("test-device", &CapabilityDefaults::default())
    }

    fn no_hevc_device() -> DeviceCapabilityProfile {
        DeviceCapabilityProfile {
            supports_hevc: false,
            ..device()
        }
    }

    fn decide(
        source: &SourceMediaProfile,
        device: &DeviceCapabilityProfile,
        request: &TranscodingRequest,
    ) -> TranscodingProfile {
        DecisionEngine::new().decide(source, device, &DeviceFormatSupport::default(), request)
    }

    // -- tiers --------------------------------------------------------------

    #[test]
    fn bitrate_tier_boundaries() {
        assert_eq!(base_video_bitrate(0), 2_000_000);
        assert_eq!(base_video_bitrate(921_600), 2_000_000);
        assert_eq!(base_video_bitrate(921_601), 5_000_000);
        assert_eq!(base_video_bitrate(2_073_600), 5_000_000);
        assert_eq!(base_video_bitrate(2_073_601), 10_000_000);
        assert_eq!(base_video_bitrate(3_840_000), 10_000_000);
        assert_eq!(base_video_bitrate(3_840_001), 20_000_000);
        assert_eq!(base_video_bitrate(u64::MAX), 20_000_000);
    }

    #[test]
    fn hevc_discount_is_exact() {
        assert_eq!(discounted_bitrate(20_000_000, VideoCodec::Hevc), 14_000_000);
        assert_eq!(discounted_bitrate(10_000_000, VideoCodec::Hevc), 7_000_000);
        assert_eq!(discounted_bitrate(5_000_000, VideoCodec::Hevc), 3_500_000);
        assert_eq!(discounted_bitrate(2_000_000, VideoCodec::Hevc), 1_400_000);
        assert_eq!(discounted_bitrate(5_000_000, VideoCodec::Av1), 5_000_000);
    }

    // -- scenarios ----------------------------------------------------------

    #[test]
    fn uhd_source_on_hevc_device_uses_discounted_hevc() {
        let profile = decide(&source(3840, 2160), &device(), &TranscodingRequest::new("tv"));
        assert_eq!(profile.video_codec, VideoCodec::Hevc);
        assert_eq!(profile.video_bitrate, 14_000_000);
    }

    #[test]
    fn hd_source_without_hevc_uses_h264_tier() {
        let profile = decide(
            &source(1920, 1080),
            &no_hevc_device(),
            &TranscodingRequest::new("tv"),
        );
        assert_eq!(profile.video_codec, VideoCodec::H264);
        assert_eq!(profile.video_bitrate, 5_000_000);
    }

    #[test]
    fn dts_source_is_downmixed_to_ac3() {
        let src = SourceMediaProfile {
            audio_codec: AudioCodec::Dts,
            ..SourceMediaProfile::default()
        };
        let profile = decide(&src, &device(), &TranscodingRequest::new("tv"));
        assert_eq!(profile.audio_codec, AudioCodec::Ac3);
    }

    #[test]
    fn truehd_downmix_beats_device_preference() {
        let src = SourceMediaProfile {
            audio_codec: AudioCodec::TrueHd,
            ..SourceMediaProfile::default()
        };
        let dev = DeviceCapabilityProfile {
            preferred_audio_codec: Some(AudioCodec::Eac3),
            ..device()
        };
        assert_eq!(
            decide(&src, &dev, &TranscodingRequest::new("tv")).audio_codec,
            AudioCodec::Ac3
        );
    }

    #[test]
    fn request_cap_applies() {
        let profile = decide(
            &source(1920, 1080),
            &no_hevc_device(),
            &TranscodingRequest::new("tv").with_max_bitrate(1_000_000),
        );
        assert_eq!(profile.video_bitrate, 1_000_000);
    }

    // -- codec chain --------------------------------------------------------

    #[test]
    fn hevc_needs_uhd_width() {
        let profile = decide(&source(3839, 2160), &device(), &TranscodingRequest::new("tv"));
        assert_eq!(profile.video_codec, VideoCodec::H264);
        assert_eq!(profile.video_bitrate, 20_000_000);
    }

    #[test]
    fn av1_when_supported_and_preferred() {
        let dev = DeviceCapabilityProfile {
            supports_av1: true,
            preferred_video_codec: VideoCodec::Av1,
            ..device()
        };
        let profile = decide(&source(1920, 1080), &dev, &TranscodingRequest::new("tv"));
        assert_eq!(profile.video_codec, VideoCodec::Av1);
        assert_eq!(profile.video_bitrate, 5_000_000);
    }

    #[test]
    fn hevc_outranks_av1_for_uhd() {
        let dev = DeviceCapabilityProfile {
            supports_av1: true,
            preferred_video_codec: VideoCodec::Av1,
            ..device()
        };
        let profile = decide(&source(3840, 2160), &dev, &TranscodingRequest::new("tv"));
        assert_eq!(profile.video_codec, VideoCodec::Hevc);
    }

    #[test]
    fn av1_preference_without_support_falls_back_to_h264() {
        let dev = DeviceCapabilityProfile {
            supports_av1: false,
            preferred_video_codec: VideoCodec::Av1,
            ..device()
        };
        let profile = decide(&source(1920, 1080), &dev, &TranscodingRequest::new("tv"));
        assert_eq!(profile.video_codec, VideoCodec::H264);
    }

    #[test]
    fn request_codec_preference_does_not_override_rules() {
        let request = TranscodingRequest {
            preferred_codec: Some(VideoCodec::Vp9),
            ..TranscodingRequest::new("tv")
        };
        let profile = decide(&source(1920, 1080), &device(), &request);
        assert_eq!(profile.video_codec, VideoCodec::H264);
    }

    // -- container ----------------------------------------------------------

    #[test]
    fn mp4_wins_when_declared() {
        let dev = DeviceCapabilityProfile {
            preferred_container: Some(Container::Webm),
            ..device()
        };
        let formats = DeviceFormatSupport::new(["mkv", "MP4"]);
        let profile = DecisionEngine::new().decide(
            &SourceMediaProfile::default(),
            &dev,
            &formats,
            &TranscodingRequest::new("tv"),
        );
        assert_eq!(profile.container, Container::Mp4);
    }

    #[test]
    fn preferred_container_without_mp4() {
        let dev = DeviceCapabilityProfile {
            preferred_container: Some(Container::Webm),
            ..device()
        };
        let formats = DeviceFormatSupport::from_csv("mkv, webm");
        let profile = DecisionEngine::new().decide(
            &SourceMediaProfile::default(),
            &dev,
            &formats,
            &TranscodingRequest::new("tv"),
        );
        assert_eq!(profile.container, Container::Webm);
    }

    #[test]
    fn mkv_is_the_fallback_container() {
        let profile = decide(
            &SourceMediaProfile::default(),
            &device(),
            &TranscodingRequest::new("tv"),
        );
        assert_eq!(profile.container, Container::Mkv);
    }

    // -- clamping & audio ---------------------------------------------------

    #[test]
    fn device_cap_applies_after_request_cap() {
        let dev = DeviceCapabilityProfile {
            max_bitrate: 3_000_000,
            ..no_hevc_device()
        };
        let profile = decide(
            &source(1920, 1080),
            &dev,
            &TranscodingRequest::new("tv").with_max_bitrate(4_000_000),
        );
        assert_eq!(profile.video_bitrate, 3_000_000);
    }

    #[test]
    fn request_cap_above_base_leaves_base() {
        let profile = decide(
            &source(1280, 720),
            &device(),
            &TranscodingRequest::new("tv").with_max_bitrate(50_000_000),
        );
        assert_eq!(profile.video_bitrate, 2_000_000);
    }

    #[test]
    fn audio_bitrate_caps() {
        let profile = decide(&source(1920, 1080), &device(), &TranscodingRequest::new("tv"));
        assert_eq!(profile.audio_bitrate, 320_000);
        assert_eq!(profile.audio_channels, 2);

        let slow = DeviceCapabilityProfile {
            max_bitrate: 2_000_000,
            ..device()
        };
        let profile = decide(&source(1920, 1080), &slow, &TranscodingRequest::new("tv"));
        assert_eq!(profile.audio_bitrate, 100_000);
    }

    #[test]
    fn bitrate_invariants_hold_across_inputs() {
        let sizes = [
            (640, 360),
            (1280, 720),
            (1920, 1080),
            (2560, 1440),
            (3840, 2160),
            (7680, 4320),
        ];
        let device_caps = [0, 500_000, 3_000_000, 8_000_000, 20_000_000, 100_000_000];
        let request_caps = [0, 750_000, 4_000_000, 30_000_000];

        for (w, h) in sizes {
            for device_cap in device_caps {
                for request_cap in request_caps {
                    for supports_hevc in [true, false] {
                        let dev = DeviceCapabilityProfile {
                            max_bitrate: device_cap,
                            supports_hevc,
                            ..device()
                        };
                        let src = source(w, h);
                        let request = TranscodingRequest::new("tv").with_max_bitrate(request_cap);
                        let profile = decide(&src, &dev, &request);

                        assert!(profile.video_bitrate <= device_cap);
                        if request_cap > 0 {
                            assert!(profile.video_bitrate <= request_cap);
                        }
                        if profile.video_codec == VideoCodec::Hevc {
                            let base = base_video_bitrate(src.pixel_count());
                            assert!(profile.video_bitrate <= base * 7 / 10);
                        }
                        assert!(profile.audio_bitrate <= 320_000);
                        assert!(profile.audio_bitrate <= device_cap / 20);
                    }
                }
            }
        }
    }

    // -- resolution & static fields -----------------------------------------

    #[test]
    fn resolution_ceiling_only_when_source_exceeds_device() {
        let dev = DeviceCapabilityProfile {
            max_width: 1920,
            max_height: 1080,
            ..device()
        };
        let profile = decide(&source(3840, 2160), &dev, &TranscodingRequest::new("tv"));
        assert_eq!(profile.max_width, Some(1920));
        assert_eq!(profile.max_height, Some(1080));

        let profile = decide(&source(1920, 1080), &dev, &TranscodingRequest::new("tv"));
        assert_eq!(profile.max_width, None);
        assert_eq!(profile.max_height, None);
    }

    #[test]
    fn taller_source_triggers_ceiling() {
        let dev = DeviceCapabilityProfile {
            max_width: 1920,
            max_height: 1080,
            ..device()
        };
        let profile = decide(&source(1440, 1440), &dev, &TranscodingRequest::new("tv"));
        assert_eq!((profile.max_width, profile.max_height), (Some(1920), Some(1080)));
    }

    #[test]
    fn static_fields() {
        let src = SourceMediaProfile {
            frame_rate: 59.94,
            ..SourceMediaProfile::default()
        };
        let profile = decide(&src, &device(), &TranscodingRequest::new("tv"));
        assert_eq!(profile.profile_type, ProfileType::Video);
        assert_eq!(profile.context, EncodingContext::Streaming);
        assert_eq!(profile.protocol, StreamProtocol::Http);
        assert_eq!(profile.transcode_seek_info, TranscodeSeekInfo::Auto);
        assert!(!profile.copy_timestamps);
        assert!(profile.enable_subtitles_in_manifest);
        assert_eq!(profile.max_framerate, 59.94);
    }

    #[test]
    fn decide_is_idempotent() {
        let src = source(2560, 1440);
        let dev = device();
        let formats = DeviceFormatSupport::new(["mp4"]);
        let request = TranscodingRequest::new("tv").with_max_bitrate(8_000_000);
        let engine = DecisionEngine::new();

        let a = engine.decide(&src, &dev, &formats, &request);
        let b = engine.decide(&src, &dev, &formats, &request);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn profile_serializes_type_field() {
        let profile = decide(&source(1920, 1080), &device(), &TranscodingRequest::new("tv"));
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["type"], "Video");
        assert_eq!(json["protocol"], "http");
        assert_eq!(json["container"], "mkv");
        assert!(json["max_width"].is_null());
    }

    #[test]
    fn format_support_parsing() {
        let formats = DeviceFormatSupport::from_csv(" mp4 ,, mkv ");
        assert_eq!(formats.containers(), ["mp4", "mkv"]);
        assert!(formats.supports("MKV"));
        assert!(!formats.supports("webm"));
        let json: DeviceFormatSupport = serde_json::from_str(r#"["ts","mp4"]"#).unwrap();
        assert!(json.supports("mp4"));
    }
}
