use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "streamwise")]
#[command(author, version, about = "Adaptive transcoding decision engine")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decide how to transcode an item for a device
    Decide {
        /// JSON file with the item's metadata
        #[arg(long, required = true)]
        item: PathBuf,

        /// Identifier of the playback device
        #[arg(long, default_value = "default")]
        device_id: String,

        /// Comma-separated containers the device declares (e.g. "mp4,mkv")
        #[arg(long, default_value = "")]
        formats: String,

        /// Client bitrate cap in bits per second (0 = none)
        #[arg(long, default_value = "0")]
        max_bitrate: u64,

        /// Video codec the client would prefer
        #[arg(long)]
        preferred_codec: Option<String>,

        /// Request hardware acceleration
        #[arg(long)]
        hw: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve and display a device's capabilities
    Device {
        /// Device identifier
        #[arg(required = true)]
        device_id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List transcoding presets
    Presets {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
