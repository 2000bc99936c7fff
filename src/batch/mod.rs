//! Frame batching
//!
//! Slices variable-size sample buffers from the playback pipeline into the
//! fixed-size frames a block encoder consumes:
//! - Sample formats and silence fill
//! - Fixed-size slicing with no carry buffer across calls
//! - Silence padding of a final partial frame

mod batcher;
mod format;
mod frame;

pub use batcher::{FrameBatcher, FrameSlice, PaddedChunk, MAX_PLANES};
pub use format::{fill_silence, SampleFormat};
pub use frame::Frame;
