//! Encoder and muxer plumbing
//!
//! - `EncoderBackend`: one "submit frame, get packets" capability over both
//!   encoder interaction styles (push-then-drain and single-call)
//! - `EncoderAdapter`: re-times emitted packets from the encoder's time base
//!   into the container stream's and forwards them to the muxer
//! - `Muxer`: the container writer collaborator

mod adapter;
mod backend;
mod packet;

pub use adapter::{EncoderAdapter, SubmitReport};
pub use backend::{EncoderBackend, PushDrainEncoder, SingleCallEncoder};
pub use packet::{EncodedPacket, Muxer};
