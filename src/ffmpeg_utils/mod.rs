//! FFmpeg backend
//!
//! Compiled with the `ffmpeg` feature. Provides:
//! - `LavcAudioEncoder`: a push/drain encoder over an FFmpeg audio encoder
//! - `OutputMuxer`: the muxer collaborator over an FFmpeg output context
//! - Conversions between the crate's `Rational` and FFmpeg's

pub mod encoder;
pub mod output;

pub use ffmpeg_next as ffmpeg;

pub use encoder::LavcAudioEncoder;
pub use output::OutputMuxer;

use ffmpeg::util::format::sample::{Sample, Type};

use crate::batch::SampleFormat;
use crate::error::{EncodeError, Result};
use crate::timebase::Rational;

/// Initialize the FFmpeg library; call once before opening encoders.
pub fn init() -> Result<()> {
    ffmpeg::init().map_err(|e| EncodeError::Ffmpeg(format!("ffmpeg::init() failed: {}", e)))?;
    tracing::info!("FFmpeg initialized");
    Ok(())
}

impl From<ffmpeg::Rational> for Rational {
    fn from(r: ffmpeg::Rational) -> Self {
        Rational::new(r.numerator(), r.denominator())
    }
}

impl From<Rational> for ffmpeg::Rational {
    fn from(r: Rational) -> Self {
        ffmpeg::Rational::new(r.num, r.den)
    }
}

impl From<SampleFormat> for Sample {
    fn from(format: SampleFormat) -> Self {
        let kind = if format.is_planar() {
            Type::Planar
        } else {
            Type::Packed
        };
        match format {
            SampleFormat::U8 | SampleFormat::U8P => Sample::U8(kind),
            SampleFormat::S16 | SampleFormat::S16P => Sample::I16(kind),
            SampleFormat::S32 | SampleFormat::S32P => Sample::I32(kind),
            SampleFormat::F32 | SampleFormat::F32P => Sample::F32(kind),
            SampleFormat::F64 | SampleFormat::F64P => Sample::F64(kind),
        }
    }
}

/// Map an FFmpeg sample format onto the engine's, if supported.
pub fn sample_format(sample: Sample) -> Option<SampleFormat> {
    let format = match sample {
        Sample::U8(Type::Packed) => SampleFormat::U8,
        Sample::U8(Type::Planar) => SampleFormat::U8P,
        Sample::I16(Type::Packed) => SampleFormat::S16,
        Sample::I16(Type::Planar) => SampleFormat::S16P,
        Sample::I32(Type::Packed) => SampleFormat::S32,
        Sample::I32(Type::Planar) => SampleFormat::S32P,
        Sample::F32(Type::Packed) => SampleFormat::F32,
        Sample::F32(Type::Planar) => SampleFormat::F32P,
        Sample::F64(Type::Packed) => SampleFormat::F64,
        Sample::F64(Type::Planar) => SampleFormat::F64P,
        _ => return None,
    };
    Some(format)
}
