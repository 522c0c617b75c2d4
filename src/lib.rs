pub mod decode;
pub mod error;
pub mod format;
pub mod utils;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use decode::{decode_frame, DecodeEngine, DecoderSession, PlanarDestination, PlanarFrame};
pub use error::{BoundsError, DecodeError, EngineError, GeometryError};
pub use format::{unpack_row, FrameGeometry, PlanarRow};

/// Prefix for environment overrides, e.g. `V210DEC_DECODER__THREADED=false`.
pub const ENV_PREFIX: &str = "V210DEC";

/// System configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub decoder: DecoderConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    pub threaded: bool,
    pub log_rows: bool, // Per-row trace events
    pub frame_alignment: usize,
}

/// Dimensions of the frames fed to the demo binary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            threaded: true,
            log_rows: false,
            frame_alignment: 32,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl Config {
    /// Layer defaults, an optional TOML file and `V210DEC_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Config::default())?);
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
