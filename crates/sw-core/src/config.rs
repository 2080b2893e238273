//! Application configuration types.
//!
//! The top-level [`Config`] struct carries the device cache policy, the
//! capability defaults used when a device cannot be probed, and any extra
//! presets to seed at startup. Every section defaults sensibly so an empty
//! file is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::media::{AudioCodec, Container, HardwareAcceleration, VideoCodec};
use crate::preset::TranscodingPreset;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub devices: DeviceCacheConfig,
    pub defaults: CapabilityDefaults,
    /// Presets upserted after the built-ins, in order.
    pub presets: Vec<TranscodingPreset>,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Config(format!("config parse error: {e}")))
    }

    /// Deserialize a `Config` from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| Error::Config(format!("config parse error: {e}")))
    }

    /// Read and parse a config file. Files ending in `.json` are parsed as
    /// JSON, everything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents),
            _ => Self::from_toml(&contents),
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.devices.probe_timeout_ms == 0 {
            warnings.push(
                "devices.probe_timeout_ms is 0; probes that do not complete immediately \
                 will fall back to defaults"
                    .into(),
            );
        }

        if self.devices.cache_ttl_secs == 0 {
            warnings.push(
                "devices.cache_ttl_secs is 0; device capabilities are cached forever".into(),
            );
        }

        if self.devices.max_entries == 0 {
            warnings.push("devices.max_entries is 0; the device cache is unbounded".into());
        }

        if self.defaults.max_bitrate == 0 {
            warnings.push("defaults.max_bitrate is 0; every decision will have zero bitrate".into());
        }

        if self.defaults.max_width == 0 || self.defaults.max_height == 0 {
            warnings.push("defaults.max_width/max_height must be non-zero".into());
        }

        for (i, preset) in self.presets.iter().enumerate() {
            if let Err(e) = preset.validate() {
                warnings.push(format!("presets[{i}]: {e}"));
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Device capability cache policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceCacheConfig {
    /// Lifetime of a successfully probed profile. `0` caches forever.
    pub cache_ttl_secs: u64,
    /// Lifetime of a default profile stored after a failed probe.
    pub failure_ttl_secs: u64,
    /// Upper bound on a single capability probe.
    pub probe_timeout_ms: u64,
    /// Most devices kept in the cache. `0` leaves it unbounded.
    pub max_entries: usize,
}

impl DeviceCacheConfig {
    /// TTL for probed profiles, or `None` when entries never expire.
    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_secs > 0).then(|| Duration::from_secs(self.cache_ttl_secs))
    }

    /// TTL for failure defaults, or `None` when entries never expire.
    pub fn failure_ttl(&self) -> Option<Duration> {
        (self.failure_ttl_secs > 0).then(|| Duration::from_secs(self.failure_ttl_secs))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn max_entries(&self) -> Option<usize> {
        (self.max_entries > 0).then_some(self.max_entries)
    }
}

impl Default for DeviceCacheConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 3600,
            failure_ttl_secs: 60,
            probe_timeout_ms: 2000,
            max_entries: 10_000,
        }
    }
}

/// Best-effort capabilities assumed for a device that has not been (or
/// could not be) probed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityDefaults {
    pub supports_hevc: bool,
    pub supports_av1: bool,
    pub supports_hdr: bool,
    pub max_bitrate: u64,
    pub max_width: u32,
    pub max_height: u32,
    pub preferred_video_codec: VideoCodec,
    pub preferred_audio_codec: Option<AudioCodec>,
    pub preferred_container: Option<Container>,
    pub hardware_acceleration: HardwareAcceleration,
}

impl Default for CapabilityDefaults {
    fn default() -> Self {
        Self {
            supports_hevc: true,
            supports_av1: false,
            supports_hdr: true,
            max_bitrate: 20_000_000,
            max_width: 3840,
            max_height: 2160,
            preferred_video_codec: VideoCodec::H264,
            preferred_audio_codec: Some(AudioCodec::Aac),
            preferred_container: None,
            hardware_acceleration: HardwareAcceleration::Auto,
        }
    }
}
