mod cli;

use streamwise::config;
use sw_core::VideoCodec;
use sw_device::{DefaultCapabilitySource, DeviceCapabilityProfile};
use sw_engine::{
    DeviceFormatSupport, ItemMetadata, TranscodingProfile, TranscodingRequest, TranscodingService,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "streamwise=trace,sw_engine=trace,sw_device=trace,sw_core=debug".to_string()
        } else {
            "streamwise=info,sw_engine=info,sw_device=info,sw_core=info".to_string()
        }
    });

    // Logs go to stderr so `--json` output stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Decide {
            item,
            device_id,
            formats,
            max_bitrate,
            preferred_codec,
            hw,
            json,
        } => {
            let preferred_codec = preferred_codec
                .as_deref()
                .map(str::parse::<VideoCodec>)
                .transpose()?;
            let request = TranscodingRequest {
                device_id,
                max_bitrate,
                preferred_codec,
                enable_hardware_acceleration: hw,
            };
            let formats = DeviceFormatSupport::from_csv(&formats);
            decide(&item, &formats, &request, cli.config.as_deref(), json)
        }
        Commands::Device { device_id, json } => {
            show_device(&device_id, cli.config.as_deref(), json)
        }
        Commands::Presets { json } => list_presets(cli.config.as_deref(), json),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("streamwise {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn build_service(config_path: Option<&Path>) -> Result<TranscodingService> {
    let config = config::load_config_or_default(config_path)?;
    let source = Arc::new(DefaultCapabilitySource::new(config.defaults.clone()));
    Ok(TranscodingService::from_config(&config, source))
}

fn decide(
    item_path: &Path,
    formats: &DeviceFormatSupport,
    request: &TranscodingRequest,
    config_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let contents = std::fs::read_to_string(item_path)
        .with_context(|| format!("Failed to read item metadata: {:?}", item_path))?;
    let item: ItemMetadata = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse item metadata: {:?}", item_path))?;

    let service = build_service(config_path)?;
    let rt = tokio::runtime::Runtime::new()?;
    let profile = rt.block_on(service.decide(&item, formats, request));

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        print_profile(&profile);
    }

    Ok(())
}

fn print_profile(profile: &TranscodingProfile) {
    println!("Container: {}", profile.container);
    println!("Video: {} @ {} bps", profile.video_codec, profile.video_bitrate);
    println!(
        "Audio: {} @ {} bps, {}ch",
        profile.audio_codec, profile.audio_bitrate, profile.audio_channels
    );
    match (profile.max_width, profile.max_height) {
        (Some(w), Some(h)) => println!("Max resolution: {}x{}", w, h),
        _ => println!("Max resolution: source"),
    }
    println!("Max framerate: {:.3}", profile.max_framerate);
    println!(
        "Delivery: {} {} over {} (seek info: {})",
        profile.profile_type, profile.context, profile.protocol, profile.transcode_seek_info
    );
}

fn show_device(device_id: &str, config_path: Option<&Path>, json: bool) -> Result<()> {
    let service = build_service(config_path)?;
    let rt = tokio::runtime::Runtime::new()?;
    let resolution = rt.block_on(service.resolver().resolve(device_id));
    let source = resolution.label();
    let profile = resolution.into_profile();

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        print_device(&profile, source);
    }

    Ok(())
}

fn print_device(profile: &DeviceCapabilityProfile, source: &str) {
    println!("Device: {} ({})", profile.device_id, source);
    println!(
        "HEVC: {}  AV1: {}  HDR: {}",
        profile.supports_hevc, profile.supports_av1, profile.supports_hdr
    );
    println!("Max bitrate: {} bps", profile.max_bitrate);
    println!("Max resolution: {}x{}", profile.max_width, profile.max_height);
    println!("Preferred video codec: {}", profile.preferred_video_codec);
    if let Some(audio) = profile.preferred_audio_codec {
        println!("Preferred audio codec: {}", audio);
    }
    if let Some(container) = profile.preferred_container {
        println!("Preferred container: {}", container);
    }
    println!("Hardware acceleration: {}", profile.hardware_acceleration);
    println!("Last analyzed: {}", profile.last_analyzed.to_rfc3339());
}

fn list_presets(config_path: Option<&Path>, json: bool) -> Result<()> {
    let service = build_service(config_path)?;
    let presets = service.list_presets();

    if json {
        println!("{}", serde_json::to_string_pretty(&presets)?);
        return Ok(());
    }

    println!("Presets: {}", presets.len());
    for preset in &presets {
        println!(
            "  {} [{}] {} {} bps / {} {} bps ({} {})",
            preset.name,
            preset.id,
            preset.video_codec,
            preset.video_bitrate,
            preset.audio_codec,
            preset.audio_bitrate,
            preset.profile,
            preset.level
        );
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            let warnings = config.validate();
            if warnings.is_empty() {
                println!("✓ Configuration is valid");
            } else {
                println!("Configuration loaded with {} warning(s):", warnings.len());
                for warning in &warnings {
                    println!("  ! {}", warning);
                }
            }
            println!("  Probe timeout: {} ms", config.devices.probe_timeout_ms);
            println!("  Device cache TTL: {} s", config.devices.cache_ttl_secs);
            println!("  Device cache size: {}", config.devices.max_entries);
            println!("  Extra presets: {}", config.presets.len());
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Probe timeout: {} ms", config.devices.probe_timeout_ms);
            println!("  Device cache TTL: {} s", config.devices.cache_ttl_secs);
        }
    }

    Ok(())
}
