//! Fixed-size frame slicing
//!
//! Only whole frames are consumed from a non-final chunk; the caller
//! resubmits the remainder on its next call. A final chunk that does not
//! divide evenly is copied into a scratch buffer with `frame_size - 1`
//! samples of silence appended, which is always enough to complete the
//! last frame.

use super::{fill_silence, SampleFormat};
use crate::error::{EncodeError, Result};

/// Most channels (and so data planes) an encoder frame can carry
pub const MAX_PLANES: usize = 8;

/// Slices sample buffers into fixed-size frames
#[derive(Debug, Clone)]
pub struct FrameBatcher {
    frame_size: usize,
    format: SampleFormat,
    channels: usize,
}

impl FrameBatcher {
    pub fn new(frame_size: usize, format: SampleFormat, channels: usize) -> Result<Self> {
        if frame_size == 0 {
            return Err(EncodeError::InvalidFrameSize(frame_size));
        }
        if channels == 0 {
            return Err(EncodeError::UnsupportedChannelLayout(channels));
        }
        if channels > MAX_PLANES {
            return Err(EncodeError::TooManyChannels {
                channels,
                limit: MAX_PLANES,
            });
        }
        Ok(Self {
            frame_size,
            format,
            channels,
        })
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn num_planes(&self) -> usize {
        if self.format.is_planar() {
            self.channels
        } else {
            1
        }
    }

    /// Bytes per sample within one plane
    pub fn stride(&self) -> usize {
        if self.format.is_planar() {
            self.format.bytes_per_sample()
        } else {
            self.format.bytes_per_sample() * self.channels
        }
    }

    /// Whether a final chunk of `samples` needs silence padding
    pub fn needs_padding(&self, samples: usize) -> bool {
        samples % self.frame_size != 0
    }

    /// Check that `planes` can hold `samples` samples in this layout.
    pub fn check_input(&self, planes: &[&[u8]], samples: usize) -> Result<()> {
        let expected = self.num_planes();
        if planes.len() != expected {
            return Err(EncodeError::PlaneCount {
                expected,
                actual: planes.len(),
            });
        }
        let needed = samples * self.stride();
        for (plane, data) in planes.iter().enumerate() {
            if data.len() < needed {
                return Err(EncodeError::ShortPlane {
                    plane,
                    needed,
                    actual: data.len(),
                });
            }
        }
        Ok(())
    }

    /// Copy a final partial chunk into scratch planes with trailing silence.
    pub fn pad_final(&self, planes: &[&[u8]], samples: usize) -> PaddedChunk {
        let stride = self.stride();
        let byte_len = samples * stride;
        let extra_len = (self.frame_size - 1) * stride;

        let planes = planes
            .iter()
            .map(|data| {
                let mut padded = vec![0u8; byte_len + extra_len];
                padded[..byte_len].copy_from_slice(&data[..byte_len]);
                fill_silence(&mut padded[byte_len..], self.format);
                padded
            })
            .collect();

        PaddedChunk {
            planes,
            samples: samples + self.frame_size - 1,
        }
    }

    /// Iterate over the whole frames contained in `samples` input samples.
    pub fn frames<'a>(&self, planes: &[&'a [u8]], samples: usize) -> Frames<'a> {
        Frames {
            planes: planes.to_vec(),
            frame_size: self.frame_size,
            stride: self.stride(),
            samples,
            offset: 0,
        }
    }
}

/// Scratch copy of a final chunk, silence-padded; released when dropped
#[derive(Debug)]
pub struct PaddedChunk {
    planes: Vec<Vec<u8>>,
    samples: usize,
}

impl PaddedChunk {
    /// Padded length in samples, used as the input length for slicing
    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn planes(&self) -> Vec<&[u8]> {
        self.planes.iter().map(|p| p.as_slice()).collect()
    }
}

/// One fixed-size slice of the input
#[derive(Debug, Clone)]
pub struct FrameSlice<'a> {
    /// Offset of the first sample of this slice within the chunk
    pub offset: usize,
    pub planes: Vec<&'a [u8]>,
}

/// Iterator over whole frames of a chunk
#[derive(Debug)]
pub struct Frames<'a> {
    planes: Vec<&'a [u8]>,
    frame_size: usize,
    stride: usize,
    samples: usize,
    offset: usize,
}

impl<'a> Iterator for Frames<'a> {
    type Item = FrameSlice<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.samples - self.offset < self.frame_size {
            return None;
        }
        let start = self.offset * self.stride;
        let end = start + self.frame_size * self.stride;
        let planes = self.planes.iter().map(|&p| &p[start..end]).collect();
        let slice = FrameSlice {
            offset: self.offset,
            planes,
        };
        self.offset += self.frame_size;
        Some(slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s16_stereo_planar(samples: usize) -> Vec<Vec<u8>> {
        vec![vec![0x11; samples * 2], vec![0x22; samples * 2]]
    }

    #[test]
    fn test_non_final_consumes_whole_frames() {
        let batcher = FrameBatcher::new(1024, SampleFormat::S16P, 2).unwrap();
        let data = s16_stereo_planar(2600);
        let planes: Vec<&[u8]> = data.iter().map(|p| p.as_slice()).collect();

        let frames: Vec<_> = batcher.frames(&planes, 2600).collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].offset, 0);
        assert_eq!(frames[1].offset, 1024);
        assert_eq!(frames[1].planes[0].len(), 1024 * 2);
    }

    #[test]
    fn test_final_chunk_padded_with_silence() {
        let batcher = FrameBatcher::new(1024, SampleFormat::S16P, 2).unwrap();
        let data = s16_stereo_planar(552);
        let planes: Vec<&[u8]> = data.iter().map(|p| p.as_slice()).collect();

        assert!(batcher.needs_padding(552));
        let padded = batcher.pad_final(&planes, 552);
        assert_eq!(padded.samples(), 552 + 1023);

        let padded_planes = padded.planes();
        let frames: Vec<_> = batcher.frames(&padded_planes, padded.samples()).collect();
        assert_eq!(frames.len(), 1);

        let left = frames[0].planes[0];
        assert_eq!(left.len(), 1024 * 2);
        assert!(left[..552 * 2].iter().all(|&b| b == 0x11));
        assert!(left[552 * 2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_u8_padding_uses_midpoint() {
        let batcher = FrameBatcher::new(4, SampleFormat::U8, 2).unwrap();
        let data = vec![7u8; 3 * 2];
        let padded = batcher.pad_final(&[data.as_slice()], 3);
        let planes = padded.planes();
        let frame: Vec<_> = batcher.frames(&planes, padded.samples()).collect();
        assert_eq!(frame.len(), 1);
        assert_eq!(frame[0].planes[0], &[7u8, 7, 7, 7, 7, 7, 0x80, 0x80]);
    }

    #[test]
    fn test_interleaved_stride() {
        let batcher = FrameBatcher::new(960, SampleFormat::F32, 2).unwrap();
        assert_eq!(batcher.num_planes(), 1);
        assert_eq!(batcher.stride(), 8);
    }

    #[test]
    fn test_too_many_planes_rejected() {
        let result = FrameBatcher::new(1024, SampleFormat::F32P, 9);
        assert!(matches!(result, Err(EncodeError::TooManyChannels { .. })));
        assert!(FrameBatcher::new(1024, SampleFormat::F32, 9).is_err());
        assert!(FrameBatcher::new(1024, SampleFormat::F32P, 8).is_ok());
    }

    #[test]
    fn test_zero_channels_rejected() {
        assert!(matches!(
            FrameBatcher::new(1024, SampleFormat::S16P, 0),
            Err(EncodeError::UnsupportedChannelLayout(0))
        ));
    }

    #[test]
    fn test_zero_frame_size_rejected() {
        assert!(FrameBatcher::new(0, SampleFormat::S16, 2).is_err());
    }

    #[test]
    fn test_check_input() {
        let batcher = FrameBatcher::new(1024, SampleFormat::S16P, 2).unwrap();
        let data = s16_stereo_planar(100);
        let planes: Vec<&[u8]> = data.iter().map(|p| p.as_slice()).collect();
        assert!(batcher.check_input(&planes, 100).is_ok());
        assert!(matches!(
            batcher.check_input(&planes, 101),
            Err(EncodeError::ShortPlane { plane: 0, .. })
        ));
        assert!(matches!(
            batcher.check_input(&planes[..1], 100),
            Err(EncodeError::PlaneCount { expected: 2, actual: 1 })
        ));
    }
}
