//! Engine configuration
//!
//! Loads timestamp and buffering settings from TOML files.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// How frame timestamps are derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampMode {
    /// Stamp frames with the audio playback position
    #[default]
    Playback,
    /// Stamp frames with the raw input pts
    Raw,
    /// Stamp frames with the input pts, corrected across discontinuities
    CopyTs,
}

impl TimestampMode {
    /// Whether frames carry the input pts rather than the playback position
    pub fn uses_input_pts(self) -> bool {
        !matches!(self, TimestampMode::Playback)
    }

    /// Whether the shared discontinuity offset is maintained
    pub fn tracks_discontinuities(self) -> bool {
        matches!(self, TimestampMode::CopyTs)
    }
}

/// Timestamp configuration shared by the audio and video paths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestampConfig {
    /// Timestamp mode (playback, raw, copyts)
    pub mode: TimestampMode,

    /// Shift applied to every audio pts, in seconds
    pub audio_offset_secs: f64,

    /// Shift applied to every video pts, in seconds
    pub video_offset_secs: f64,

    /// Input pts jumps larger than this are treated as discontinuities
    pub discontinuity_threshold_secs: f64,
}

impl Default for TimestampConfig {
    fn default() -> Self {
        Self {
            mode: TimestampMode::Playback,
            audio_offset_secs: 0.0,
            video_offset_secs: 0.0,
            discontinuity_threshold_secs: 30.0,
        }
    }
}

/// Buffering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Minimum audio the caller should hand over per call, in seconds
    pub min_buffer_secs: f64,

    /// Frame size used for codecs without a fixed frame size (PCM)
    pub pcm_frame_size: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            min_buffer_secs: 0.25,
            pcm_frame_size: 16384,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Timestamp settings
    pub timestamps: TimestampConfig,

    /// Buffering settings
    pub buffering: BufferConfig,
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}
