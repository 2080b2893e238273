//! Concurrent device capability cache.
//!
//! Maps a device identifier to its [`DeviceCapabilityProfile`], probing the
//! injected [`CapabilitySource`] only on a miss.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use sw_core::config::{CapabilityDefaults, Config, DeviceCacheConfig};
use sw_core::Error;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::capability::DeviceCapabilityProfile;
use crate::source::CapabilitySource;

/// How a profile returned by [`DeviceCapabilityResolver::resolve`] was obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A live cache entry was returned unchanged.
    CachedHit(DeviceCapabilityProfile),
    /// The source was probed and its answer cached.
    FreshProbe(DeviceCapabilityProfile),
    /// The probe failed or timed out; default capabilities were cached.
    ProbeFailureDefault(DeviceCapabilityProfile),
}

impl Resolution {
    pub fn profile(&self) -> &DeviceCapabilityProfile {
        match self {
            Self::CachedHit(p) | Self::FreshProbe(p) | Self::ProbeFailureDefault(p) => p,
        }
    }

    pub fn into_profile(self) -> DeviceCapabilityProfile {
        match self {
            Self::CachedHit(p) | Self::FreshProbe(p) | Self::ProbeFailureDefault(p) => p,
        }
    }

    /// Short label for logs and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CachedHit(_) => "cached",
            Self::FreshProbe(_) => "probed",
            Self::ProbeFailureDefault(_) => "default",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Probed,
    Fallback,
}

/// Entry in the capability cache.
struct CacheEntry {
    profile: DeviceCapabilityProfile,
    origin: Origin,
    stored_at: Instant,
    ttl: Option<Duration>,
}

impl CacheEntry {
    fn is_live(&self) -> bool {
        self.ttl.map_or(true, |ttl| self.stored_at.elapsed() < ttl)
    }
}

/// Thread-safe resolver for device capabilities.
///
/// Concurrent misses for the same device may each probe, but only the first
/// result to reach the cache is kept; later callers get that stored value
/// back. A successful probe does replace a live fallback entry.
///
/// When a new device pushes the cache past `max_entries`, expired entries
/// are dropped first and then the oldest live ones.
pub struct DeviceCapabilityResolver {
    source: Arc<dyn CapabilitySource>,
    defaults: CapabilityDefaults,
    entries: DashMap<String, CacheEntry>,
    ttl: Option<Duration>,
    failure_ttl: Option<Duration>,
    probe_timeout: Duration,
    max_entries: Option<usize>,
}

impl DeviceCapabilityResolver {
    /// Create a resolver with the default cache policy.
    pub fn new(source: Arc<dyn CapabilitySource>, defaults: CapabilityDefaults) -> Self {
        Self::with_policy(source, defaults, &DeviceCacheConfig::default())
    }

    /// Create a resolver from the device sections of `config`.
    pub fn from_config(source: Arc<dyn CapabilitySource>, config: &Config) -> Self {
        Self::with_policy(source, config.defaults.clone(), &config.devices)
    }

    fn with_policy(
        source: Arc<dyn CapabilitySource>,
        defaults: CapabilityDefaults,
        policy: &DeviceCacheConfig,
    ) -> Self {
        Self {
            source,
            defaults,
            entries: DashMap::new(),
            ttl: policy.cache_ttl(),
            failure_ttl: policy.failure_ttl(),
            probe_timeout: policy.probe_timeout(),
            max_entries: policy.max_entries(),
        }
    }

    /// Override the lifetime of probed entries (`None` = forever).
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    /// Override the lifetime of fallback entries (`None` = forever).
    pub fn with_failure_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.failure_ttl = ttl;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Override the cache bound (`None` = unbounded).
    pub fn with_max_entries(mut self, max_entries: Option<usize>) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Resolve `device_id` to a capability profile.
    ///
    /// Never fails: an unknown device, a probe error and a probe timeout all
    /// yield a usable default profile.
    pub async fn resolve(&self, device_id: &str) -> Resolution {
        if let Some(profile) = self.cached(device_id) {
            tracing::debug!(device_id = %device_id, "device capability cache hit");
            return Resolution::CachedHit(profile);
        }

        let probe = tokio::time::timeout(self.probe_timeout, self.source.probe(device_id));
        let (profile, origin) = match probe.await {
            Ok(Ok(mut profile)) => {
                profile.device_id = device_id.to_string();
                (profile, Origin::Probed)
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    device_id = %device_id,
                    source = self.source.name(),
                    error = %e,
                    "capability probe failed, using defaults"
                );
                (self.fallback(device_id), Origin::Fallback)
            }
            Err(_) => {
                let e = Error::Timeout {
                    device_id: device_id.to_string(),
                    after_ms: self.probe_timeout.as_millis() as u64,
                };
                tracing::warn!(
                    device_id = %device_id,
                    source = self.source.name(),
                    error = %e,
                    "capability probe timed out, using defaults"
                );
                (self.fallback(device_id), Origin::Fallback)
            }
        };

        self.store(device_id, profile, origin)
    }

    /// Return the live cached profile for `device_id`, if any.
    pub fn cached(&self, device_id: &str) -> Option<DeviceCapabilityProfile> {
        self.entries
            .get(device_id)
            .filter(|entry| entry.is_live())
            .map(|entry| entry.profile.clone())
    }

    /// Drop the cached profile for `device_id`, forcing the next resolve to
    /// probe again. Returns whether an entry existed.
    pub fn invalidate(&self, device_id: &str) -> bool {
        let removed = self.entries.remove(device_id).is_some();
        if removed {
            tracing::debug!(device_id = %device_id, "device capability entry invalidated");
        }
        removed
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Remove expired entries, returning how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live());
        before.saturating_sub(self.entries.len())
    }

    /// Number of cached entries, live or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn fallback(&self, device_id: &str) -> DeviceCapabilityProfile {
        DeviceCapabilityProfile::from_defaults(device_id, &self.defaults)
    }

    fn store(
        &self,
        device_id: &str,
        profile: DeviceCapabilityProfile,
        origin: Origin,
    ) -> Resolution {
        let ttl = match origin {
            Origin::Probed => self.ttl,
            Origin::Fallback => self.failure_ttl,
        };
        let entry = CacheEntry {
            profile: profile.clone(),
            origin,
            stored_at: Instant::now(),
            ttl,
        };

        let added = match self.entries.entry(device_id.to_string()) {
            Entry::Occupied(mut occupied) => {
                let existing = occupied.get();
                let upgrade = existing.origin == Origin::Fallback && origin == Origin::Probed;
                if existing.is_live() && !upgrade {
                    // Another caller stored first; converge on its value.
                    return Resolution::CachedHit(existing.profile.clone());
                }
                occupied.insert(entry);
                false
            }
            Entry::Vacant(vacant) => {
                vacant.insert(entry);
                true
            }
        };
        // The entry guard is released here; trimming locks every shard.
        if added {
            self.enforce_capacity(device_id);
        }

        tracing::debug!(
            device_id = %device_id,
            origin = ?origin,
            "device capabilities cached"
        );
        match origin {
            Origin::Probed => Resolution::FreshProbe(profile),
            Origin::Fallback => Resolution::ProbeFailureDefault(profile),
        }
    }

    fn enforce_capacity(&self, keep: &str) {
        let Some(max) = self.max_entries else {
            return;
        };
        if self.entries.len() <= max {
            return;
        }

        let purged = self.purge_expired();
        let mut evicted = 0usize;
        while self.entries.len() > max && self.evict_oldest(keep) {
            evicted += 1;
        }
        tracing::debug!(purged, evicted, max_entries = max, "device capability cache trimmed");
    }

    fn evict_oldest(&self, keep: &str) -> bool {
        let oldest = self
            .entries
            .iter()
            .filter(|entry| entry.key() != keep)
            .min_by_key(|entry| entry.stored_at)
            .map(|entry| entry.key().clone());

        match oldest {
            Some(key) => self.entries.remove(&key).is_some(),
            None => false,
        }
    }
}

/// Start a background task that periodically drops expired capability
/// entries.
pub fn start_cleanup_task(
    resolver: Arc<DeviceCapabilityResolver>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every.max(Duration::from_millis(1)));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            let purged = resolver.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "expired device capabilities removed");
            }
        }
    })
}
