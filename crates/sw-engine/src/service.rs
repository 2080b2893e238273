//! Facade wiring the profiler, device resolver, decision engine and preset
//! store together behind the operations exposed to collaborators.

use std::sync::Arc;
use sw_core::config::Config;
use sw_core::TranscodingPreset;
use sw_device::{CapabilitySource, DeviceCapabilityProfile, DeviceCapabilityResolver};

use crate::decision::{DecisionEngine, DeviceFormatSupport, TranscodingProfile, TranscodingRequest};
use crate::presets::{PresetStore, UpsertOutcome};
use crate::profiler::{ItemMetadata, SourceMediaProfiler};

/// Entry point for transcoding decisions and preset administration.
///
/// Cheap to clone; clones share the same device cache and preset store.
#[derive(Clone)]
pub struct TranscodingService {
    profiler: SourceMediaProfiler,
    engine: DecisionEngine,
    resolver: Arc<DeviceCapabilityResolver>,
    presets: Arc<PresetStore>,
}

impl TranscodingService {
    /// Build a service from explicit component handles.
    pub fn new(resolver: Arc<DeviceCapabilityResolver>, presets: Arc<PresetStore>) -> Self {
        Self {
            profiler: SourceMediaProfiler::new(),
            engine: DecisionEngine::new(),
            resolver,
            presets,
        }
    }

    /// Build a service from configuration and a capability source. The
    /// preset store holds the built-ins followed by the configured presets.
    pub fn from_config(config: &Config, source: Arc<dyn CapabilitySource>) -> Self {
        let resolver = Arc::new(DeviceCapabilityResolver::from_config(source, config));
        let presets = Arc::new(PresetStore::new());
        let service = Self::new(resolver, presets);
        for preset in &config.presets {
            service.upsert_preset(preset.clone());
        }
        service
    }

    /// Decide how to transcode `item` for the device named in `request`.
    pub async fn decide(
        &self,
        item: &ItemMetadata,
        formats: &DeviceFormatSupport,
        request: &TranscodingRequest,
    ) -> TranscodingProfile {
        let source = self.profiler.analyze(item);
        let device = self.resolver.resolve(&request.device_id).await.into_profile();
        self.engine.decide(&source, &device, formats, request)
    }

    pub async fn resolve_device_capabilities(&self, device_id: &str) -> DeviceCapabilityProfile {
        self.resolver.resolve(device_id).await.into_profile()
    }

    pub fn list_presets(&self) -> Vec<TranscodingPreset> {
        self.presets.list()
    }

    /// Insert or replace a preset by id. Always succeeds; a preset with a
    /// blank id or name is stored anyway and logged.
    pub fn upsert_preset(&self, preset: TranscodingPreset) -> UpsertOutcome {
        if let Err(e) = preset.validate() {
            tracing::warn!(preset_id = %preset.id, error = %e, "storing incomplete preset");
        }
        self.presets.upsert(preset)
    }

    pub fn resolver(&self) -> &Arc<DeviceCapabilityResolver> {
        &self.resolver
    }

    pub fn presets(&self) -> &Arc<PresetStore> {
        &self.presets
    }
}
