use super::SampleFormat;

/// One fixed-size block of samples on its way to the encoder.
///
/// Planes borrow the caller's buffer (or the padding scratch of a final
/// chunk); a frame lives for exactly one encoder submission.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub format: SampleFormat,
    pub channels: usize,
    /// Samples per channel
    pub samples: usize,
    /// Presentation timestamp in encoder time base ticks
    pub pts: i64,
    /// One slice per channel if planar, one interleaved slice otherwise
    pub planes: Vec<&'a [u8]>,
}

impl Frame<'_> {
    /// Total payload bytes across all planes
    pub fn byte_len(&self) -> usize {
        self.planes.iter().map(|p| p.len()).sum()
    }
}
