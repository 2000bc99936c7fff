//! Audio encode engine
//!
//! Turns the variable-size sample buffers of an audio playback pipeline
//! into fixed-size encoder frames, stamps them on a timeline shared with a
//! companion video path, and writes the encoded packets in the container
//! stream's time base.

pub mod batch;
pub mod config;
pub mod encode;
pub mod engine;
pub mod error;
pub mod session;
pub mod stats;
pub mod timebase;
pub mod timing;

#[cfg(feature = "ffmpeg")]
pub mod ffmpeg_utils;

#[cfg(test)]
pub(crate) mod tests;

pub use batch::{Frame, SampleFormat};
pub use config::{BufferConfig, EngineConfig, TimestampConfig, TimestampMode};
pub use encode::{EncodedPacket, EncoderBackend, Muxer, PushDrainEncoder, SingleCallEncoder};
pub use engine::{AudioEncodeEngine, AudioStreamSetup};
pub use error::{CodecError, EncodeError, Result};
pub use session::{Session, SessionTiming, StreamKind};
pub use stats::EngineStats;
pub use timebase::Rational;
