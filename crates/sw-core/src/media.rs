//! Media-domain enums for containers, codecs, hardware acceleration and the
//! static tags carried on a transcoding decision.
//!
//! Codec and container names are closed sets: every accepted spelling lives
//! in one `FromStr` match table, so supporting a new codec is a compile-time
//! checked change rather than a scattered string comparison.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

// ---------------------------------------------------------------------------
// Container
// ---------------------------------------------------------------------------

/// Output container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    Mp4,
    Mkv,
    Webm,
    Ts,
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mp4 => write!(f, "mp4"),
            Self::Mkv => write!(f, "mkv"),
            Self::Webm => write!(f, "webm"),
            Self::Ts => write!(f, "ts"),
        }
    }
}

impl FromStr for Container {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp4" | "m4v" | "mov" => Ok(Self::Mp4),
            "mkv" | "matroska" => Ok(Self::Mkv),
            "webm" => Ok(Self::Webm),
            "ts" | "mpegts" | "m2ts" => Ok(Self::Ts),
            other => Err(Error::Validation(format!("unknown container: {other}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// VideoCodec
// ---------------------------------------------------------------------------

/// Video codecs understood by the decision engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    H264,
    #[serde(alias = "h265")]
    Hevc,
    Av1,
    Vp9,
}

impl fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::H264 => write!(f, "h264"),
            Self::Hevc => write!(f, "hevc"),
            Self::Av1 => write!(f, "av1"),
            Self::Vp9 => write!(f, "vp9"),
        }
    }
}

impl FromStr for VideoCodec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h264" | "avc" | "avc1" | "x264" => Ok(Self::H264),
            "hevc" | "h265" | "hvc1" | "hev1" | "x265" => Ok(Self::Hevc),
            "av1" | "av01" => Ok(Self::Av1),
            "vp9" | "vp09" => Ok(Self::Vp9),
            other => Err(Error::Validation(format!("unknown video codec: {other}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// AudioCodec
// ---------------------------------------------------------------------------

/// Audio codecs understood by the decision engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodec {
    Aac,
    Ac3,
    Eac3,
    #[serde(rename = "truehd")]
    TrueHd,
    Dts,
    Flac,
    Opus,
    Mp3,
}

impl AudioCodec {
    /// High-bitrate lossless/cinema formats that are always downmixed to AC-3
    /// for streaming, whatever the device prefers.
    pub fn requires_downmix(self) -> bool {
        matches!(self, Self::Dts | Self::TrueHd)
    }
}

impl fmt::Display for AudioCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aac => write!(f, "aac"),
            Self::Ac3 => write!(f, "ac3"),
            Self::Eac3 => write!(f, "eac3"),
            Self::TrueHd => write!(f, "truehd"),
            Self::Dts => write!(f, "dts"),
            Self::Flac => write!(f, "flac"),
            Self::Opus => write!(f, "opus"),
            Self::Mp3 => write!(f, "mp3"),
        }
    }
}

impl FromStr for AudioCodec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aac" | "mp4a" => Ok(Self::Aac),
            "ac3" | "ac-3" => Ok(Self::Ac3),
            "eac3" | "e-ac-3" | "ec-3" => Ok(Self::Eac3),
            "truehd" | "mlp" => Ok(Self::TrueHd),
            "dts" | "dca" | "dts-hd" | "dtshd" => Ok(Self::Dts),
            "flac" => Ok(Self::Flac),
            "opus" => Ok(Self::Opus),
            "mp3" => Ok(Self::Mp3),
            other => Err(Error::Validation(format!("unknown audio codec: {other}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// HardwareAcceleration
// ---------------------------------------------------------------------------

/// Hardware acceleration mode a device (or its transcoder) uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HardwareAcceleration {
    None,
    #[default]
    Auto,
    Nvenc,
    Qsv,
    Vaapi,
    #[serde(rename = "videotoolbox")]
    VideoToolbox,
}

impl fmt::Display for HardwareAcceleration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Auto => write!(f, "auto"),
            Self::Nvenc => write!(f, "nvenc"),
            Self::Qsv => write!(f, "qsv"),
            Self::Vaapi => write!(f, "vaapi"),
            Self::VideoToolbox => write!(f, "videotoolbox"),
        }
    }
}

impl FromStr for HardwareAcceleration {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "auto" => Ok(Self::Auto),
            "nvenc" => Ok(Self::Nvenc),
            "qsv" => Ok(Self::Qsv),
            "vaapi" => Ok(Self::Vaapi),
            "videotoolbox" => Ok(Self::VideoToolbox),
            other => Err(Error::Validation(format!(
                "unknown hardware acceleration: {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Decision tags
// ---------------------------------------------------------------------------

/// Kind of stream a transcoding profile describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileType {
    Video,
    Audio,
}

impl fmt::Display for ProfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "Video"),
            Self::Audio => write!(f, "Audio"),
        }
    }
}

/// Whether output is consumed live or written for later use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncodingContext {
    Streaming,
    Static,
}

impl fmt::Display for EncodingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Streaming => write!(f, "Streaming"),
            Self::Static => write!(f, "Static"),
        }
    }
}

/// Delivery protocol for the transcoded stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamProtocol {
    Http,
    Hls,
}

impl fmt::Display for StreamProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Hls => write!(f, "hls"),
        }
    }
}

/// How seek positions are reported to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TranscodeSeekInfo {
    Auto,
    Bytes,
}

impl fmt::Display for TranscodeSeekInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "Auto"),
            Self::Bytes => write!(f, "Bytes"),
        }
    }
}
