//! Audio encode engine
//!
//! Sits between the audio playback thread and a block encoder:
//! - `submit`: slice a chunk into fixed-size frames, stamp each one against
//!   the shared session timeline, encode, and write the packets
//! - `shutdown`: flush the encoder once at end of stream
//!
//! All work for one call happens under the session lock, so the companion
//! video path always observes a consistent timeline.

mod drain;
mod submit;

use std::sync::Arc;

use crate::batch::{FrameBatcher, SampleFormat};
use crate::config::BufferConfig;
use crate::encode::{EncoderAdapter, EncoderBackend};
use crate::error::{EncodeError, Result};
use crate::session::{Reconciler, Session, StreamKind};
use crate::stats::EngineStats;
use crate::timebase::Rational;
use crate::timing::StreamTiming;

/// Negotiated parameters of the audio stream being encoded
#[derive(Debug, Clone)]
pub struct AudioStreamSetup {
    /// Output stream index in the muxer
    pub stream_index: usize,
    pub sample_rate: u32,
    pub channels: usize,
    pub format: SampleFormat,
    /// Frame size reported by the codec; 0 or 1 when the codec has none
    pub codec_frame_size: usize,
    pub encoder_time_base: Rational,
    pub container_time_base: Rational,
}

impl AudioStreamSetup {
    /// Setup with both time bases at one tick per sample.
    pub fn new(
        sample_rate: u32,
        channels: usize,
        format: SampleFormat,
        codec_frame_size: usize,
    ) -> Result<Self> {
        let per_sample = Rational::per_sample(sample_rate)?;
        Ok(Self {
            stream_index: 0,
            sample_rate,
            channels,
            format,
            codec_frame_size,
            encoder_time_base: per_sample,
            container_time_base: per_sample,
        })
    }

    pub fn with_stream_index(mut self, stream_index: usize) -> Self {
        self.stream_index = stream_index;
        self
    }

    pub fn with_encoder_time_base(mut self, time_base: Rational) -> Self {
        self.encoder_time_base = time_base;
        self
    }

    pub fn with_container_time_base(mut self, time_base: Rational) -> Self {
        self.container_time_base = time_base;
        self
    }
}

/// Frame batching and timestamp engine for one audio stream
#[derive(Debug)]
pub struct AudioEncodeEngine {
    session: Arc<Session>,
    sample_rate: u32,
    batcher: FrameBatcher,
    timing: StreamTiming,
    reconciler: Reconciler,
    adapter: EncoderAdapter,
    /// Frames submitted so far; drives the playback position
    frame_count: u64,
    /// Frames per `space()` hint
    buffer_frames: usize,
    /// Input pts expected at the start of the next chunk
    expected_next_pts: f64,
    /// Pts stamped on the latest frame, in encoder ticks
    last_frame_pts: Option<i64>,
    shutdown: bool,
    stats: EngineStats,
}

impl AudioEncodeEngine {
    /// Set up the engine for one audio stream.
    ///
    /// Fails when the stream cannot be encoded at all: zero sample rate,
    /// more channels than an encoder frame has planes, or invalid time bases.
    pub fn new(
        session: Arc<Session>,
        setup: AudioStreamSetup,
        backend: EncoderBackend,
        buffering: &BufferConfig,
    ) -> Result<Self> {
        if setup.sample_rate == 0 {
            return Err(EncodeError::InvalidSampleRate(setup.sample_rate));
        }

        // Codecs without a fixed frame size (PCM) take any size; pick a large one.
        let frame_size = if setup.codec_frame_size <= 1 {
            buffering.pcm_frame_size
        } else {
            setup.codec_frame_size
        };

        let batcher = FrameBatcher::new(frame_size, setup.format, setup.channels)?;
        let timing = StreamTiming::new(setup.encoder_time_base, setup.container_time_base)?;
        let reconciler = Reconciler::new(
            session.options(),
            session.encode_offset(StreamKind::Audio),
        );
        let adapter = EncoderAdapter::new(
            backend,
            setup.stream_index,
            timing.encoder_time_base(),
            timing.container_time_base(),
        );

        // enough frames for at least min_buffer_secs, but at least one
        let buffer_frames = ((setup.sample_rate as f64 * buffering.min_buffer_secs
            / frame_size as f64)
            .ceil() as usize)
            .max(1);

        tracing::info!(
            stream_index = setup.stream_index,
            sample_rate = setup.sample_rate,
            channels = setup.channels,
            format = ?setup.format,
            frame_size,
            encoder_time_base = %timing.encoder_time_base(),
            container_time_base = %timing.container_time_base(),
            mode = ?reconciler.mode(),
            "audio encode engine ready"
        );

        Ok(Self {
            session,
            sample_rate: setup.sample_rate,
            batcher,
            timing,
            reconciler,
            adapter,
            frame_count: 0,
            buffer_frames,
            expected_next_pts: 0.0,
            last_frame_pts: None,
            shutdown: false,
            stats: EngineStats::default(),
        })
    }

    /// Samples per encoder frame
    pub fn frame_size(&self) -> usize {
        self.batcher.frame_size()
    }

    /// Samples the caller should hand over per call
    pub fn space(&self) -> usize {
        self.batcher.frame_size() * self.buffer_frames
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimestampConfig;
    use crate::tests::fixtures::{EchoEncoder, RecordingMuxer};

    fn session() -> Arc<Session> {
        Session::new(TimestampConfig::default(), Box::new(RecordingMuxer::new()))
    }

    fn engine(setup: AudioStreamSetup) -> Result<AudioEncodeEngine> {
        AudioEncodeEngine::new(
            session(),
            setup,
            EncoderBackend::push_drain(EchoEncoder::new()),
            &BufferConfig::default(),
        )
    }

    #[test]
    fn test_space_covers_quarter_second() {
        let engine = engine(AudioStreamSetup::new(48_000, 2, SampleFormat::F32P, 1024).unwrap()).unwrap();
        assert_eq!(engine.frame_size(), 1024);
        // ceil(12000 / 1024) = 12 frames
        assert_eq!(engine.space(), 12 * 1024);
    }

    #[test]
    fn test_pcm_codec_uses_large_frames() {
        let engine = engine(AudioStreamSetup::new(44_100, 2, SampleFormat::S16, 0).unwrap()).unwrap();
        assert_eq!(engine.frame_size(), 16384);
        assert_eq!(engine.space(), 16384);
    }

    #[test]
    fn test_too_many_channels_is_fatal() {
        let result = engine(AudioStreamSetup::new(48_000, 9, SampleFormat::F32P, 1024).unwrap());
        assert!(matches!(result, Err(EncodeError::TooManyChannels { channels: 9, .. })));
    }

    #[test]
    fn test_zero_sample_rate_is_fatal() {
        let result = AudioStreamSetup::new(0, 2, SampleFormat::F32P, 1024);
        assert!(matches!(result, Err(EncodeError::InvalidSampleRate(0))));
    }

    #[test]
    fn test_invalid_container_time_base_is_fatal() {
        let setup = AudioStreamSetup::new(48_000, 2, SampleFormat::F32P, 1024)
            .unwrap()
            .with_container_time_base(Rational::new(1, 0));
        assert!(matches!(engine(setup), Err(EncodeError::InvalidTimeBase { .. })));
    }
}
