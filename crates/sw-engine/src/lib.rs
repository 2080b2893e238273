//! # sw-engine
//!
//! The adaptive transcoding decision engine.
//!
//! Given a source asset's metadata, a device's resolved capabilities, the
//! containers the device declares and per-request limits, [`DecisionEngine`]
//! picks the container, codecs, bitrates and resolution ceiling for a
//! transcoding session. [`TranscodingService`] wires the engine to the
//! [`SourceMediaProfiler`], the device capability resolver and the
//! [`PresetStore`].

pub mod decision;
pub mod presets;
pub mod profiler;
pub mod service;

pub use decision::{
    base_video_bitrate, DecisionEngine, DeviceFormatSupport, TranscodingProfile,
    TranscodingRequest,
};
pub use presets::{PresetStore, UpsertOutcome};
pub use profiler::{ItemMetadata, SourceMediaProfile, SourceMediaProfiler};
pub use service::TranscodingService;
