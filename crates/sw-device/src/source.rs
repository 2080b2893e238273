//! The [`CapabilitySource`] trait defining how device capabilities are
//! discovered.

use async_trait::async_trait;
use sw_core::config::CapabilityDefaults;

use crate::capability::DeviceCapabilityProfile;

/// Something able to determine a device's capabilities, typically by talking
/// to the device or a registry that knows about it.
///
/// Implementations must be safe to share across threads (`Send + Sync`).
/// Probes may be slow; the resolver bounds each call with a timeout and drops
/// the future when it expires, so implementations should be cancel-safe.
#[async_trait]
pub trait CapabilitySource: Send + Sync {
    /// Human-readable name identifying this source implementation.
    fn name(&self) -> &'static str;

    /// Determine the capabilities of `device_id`.
    ///
    /// Errors are not fatal: the resolver logs them and falls back to its
    /// configured defaults.
    async fn probe(&self, device_id: &str) -> sw_core::Result<DeviceCapabilityProfile>;
}

/// Answers every probe with the same best-effort defaults.
///
/// This stands in for a real network probe; swapping it out does not touch
/// the decision rules.
#[derive(Debug, Clone, Default)]
pub struct DefaultCapabilitySource {
    defaults: CapabilityDefaults,
}

impl DefaultCapabilitySource {
    pub fn new(defaults: CapabilityDefaults) -> Self {
        Self { defaults }
    }
}

#[async_trait]
impl CapabilitySource for DefaultCapabilitySource {
    fn name(&self) -> &'static str {
        "default"
    }

    async fn probe(&self, device_id: &str) -> sw_core::Result<DeviceCapabilityProfile> {
        tracing::debug!(device_id = %device_id, "synthesizing default device capabilities");
        Ok(DeviceCapabilityProfile::from_defaults(device_id, &self.defaults))
    }
}
