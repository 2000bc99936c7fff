//! PCM sample formats

use serde::{Deserialize, Serialize};

/// PCM sample format, packed (interleaved) or planar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    U8,
    S16,
    S32,
    F32,
    F64,
    U8P,
    S16P,
    S32P,
    F32P,
    F64P,
}

impl SampleFormat {
    /// Bytes in one sample of one channel
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::U8 | SampleFormat::U8P => 1,
            SampleFormat::S16 | SampleFormat::S16P => 2,
            SampleFormat::S32 | SampleFormat::S32P | SampleFormat::F32 | SampleFormat::F32P => 4,
            SampleFormat::F64 | SampleFormat::F64P => 8,
        }
    }

    /// One plane per channel when true, one interleaved plane otherwise
    pub fn is_planar(self) -> bool {
        matches!(
            self,
            SampleFormat::U8P
                | SampleFormat::S16P
                | SampleFormat::S32P
                | SampleFormat::F32P
                | SampleFormat::F64P
        )
    }

    /// Byte pattern of digital silence
    pub fn silence_byte(self) -> u8 {
        match self {
            // unsigned 8-bit PCM is centered on 128
            SampleFormat::U8 | SampleFormat::U8P => 0x80,
            _ => 0,
        }
    }
}

/// Fill `buf` with silence for `format`.
pub fn fill_silence(buf: &mut [u8], format: SampleFormat) {
    buf.fill(format.silence_byte());
}
