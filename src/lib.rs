//! Streamwise - adaptive transcoding decisions for media streaming
//!
//! This library crate exposes configuration loading and re-exports the
//! engine for integration testing.

pub mod config;

pub use sw_core::{AudioCodec, Container, TranscodingPreset, VideoCodec};
pub use sw_device::{
    start_cleanup_task, CapabilitySource, DefaultCapabilitySource, DeviceCapabilityProfile,
    DeviceCapabilityResolver, Resolution,
};
pub use sw_engine::{
    DecisionEngine, DeviceFormatSupport, ItemMetadata, PresetStore, SourceMediaProfile,
    SourceMediaProfiler, TranscodingProfile, TranscodingRequest, TranscodingService,
    UpsertOutcome,
};
