//! Muxer over an FFmpeg output context

use ffmpeg_next as ffmpeg;

use crate::encode::{EncodedPacket, Muxer};
use crate::error::{EncodeError, Result};

/// Writes packets into an FFmpeg output context.
///
/// The header is written on the first `start()` after every expected
/// stream has been added; until then the output reports not ready.
pub struct OutputMuxer {
    output: ffmpeg::format::context::Output,
    expected_streams: u32,
    header_written: bool,
}

impl OutputMuxer {
    pub fn new(output: ffmpeg::format::context::Output, expected_streams: u32) -> Self {
        Self {
            output,
            expected_streams,
            header_written: false,
        }
    }

    /// Mutable access for adding streams before the header is written
    pub fn output_mut(&mut self) -> &mut ffmpeg::format::context::Output {
        &mut self.output
    }

    /// Write the trailer; only meaningful once the header was written.
    pub fn finish(&mut self) -> Result<()> {
        if !self.header_written {
            return Ok(());
        }
        self.output
            .write_trailer()
            .map_err(|e| EncodeError::Ffmpeg(format!("write_trailer: {}", e)))
    }
}

impl Muxer for OutputMuxer {
    fn start(&mut self) -> bool {
        if self.header_written {
            return true;
        }
        if self.output.nb_streams() < self.expected_streams {
            return false;
        }
        match self.output.write_header() {
            Ok(()) => {
                self.header_written = true;
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to write output header");
                false
            }
        }
    }

    fn write_packet(&mut self, packet: &EncodedPacket) -> Result<()> {
        let mut pkt = ffmpeg::Packet::copy(&packet.data);
        pkt.set_stream(packet.stream_index);
        pkt.set_pts(packet.pts);
        pkt.set_dts(packet.dts);
        if let Some(duration) = packet.duration {
            pkt.set_duration(duration);
        }
        pkt.write_interleaved(&mut self.output)
            .map_err(|e| EncodeError::WritePacket(e.to_string()))
    }
}
