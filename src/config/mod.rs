pub use sw_core::config::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML (or `.json`) file
pub fn load_config(path: &Path) -> Result<Config> {
    let config = Config::load(path)
        .with_context(|| format!("Failed to load config file: {:?}", path))?;

    for warning in config.validate() {
        tracing::warn!("Config: {}", warning);
    }

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./streamwise.toml",
        "~/.config/streamwise/config.toml",
        "/etc/streamwise/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_must_exist() {
        let err = load_config_or_default(Some(Path::new("/nonexistent/streamwise.toml")))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to load config file"));
    }

    #[test]
    fn load_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("streamwise.toml");
        std::fs::write(&path, "[devices]\nprobe_timeout_ms = 750\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.devices.probe_timeout_ms, 750);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("streamwise.toml");
        std::fs::write(&path, "[devices\n").unwrap();

        assert!(load_config(&path).is_err());
    }
}
