//! # sw-device
//!
//! Resolves a device identifier to a [`DeviceCapabilityProfile`].
//!
//! Probing is delegated to an injected [`CapabilitySource`]; results are
//! kept in a concurrent cache owned by [`DeviceCapabilityResolver`]. A probe
//! that fails or exceeds its timeout never surfaces as an error: the
//! resolver substitutes the configured default capabilities instead.
//!
//! ```no_run
//! use std::sync::Arc;
//! use sw_core::config::Config;
//! use sw_device::{DefaultCapabilitySource, DeviceCapabilityResolver};
//!
//! # async fn run() {
//! let config = Config::default();
//! let source = Arc::new(DefaultCapabilitySource::new(config.defaults.clone()));
//! let resolver = DeviceCapabilityResolver::from_config(source, &config);
//! let profile = resolver.resolve("living-room-tv").await.into_profile();
//! println!("max bitrate: {}", profile.max_bitrate);
//! # }
//! ```

pub mod capability;
pub mod resolver;
pub mod source;

pub use capability::DeviceCapabilityProfile;
pub use resolver::{start_cleanup_task, DeviceCapabilityResolver, Resolution};
pub use source::{CapabilitySource, DefaultCapabilitySource};
