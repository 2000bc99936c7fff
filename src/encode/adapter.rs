//! Packet re-timing and forwarding

use super::{EncodedPacket, EncoderBackend, Muxer};
use crate::batch::Frame;
use crate::timebase::{rescale_q, Rational};

/// What one submission produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitReport {
    pub packets_written: u64,
    pub bytes_written: u64,
    /// Packets that arrived without a pts
    pub lost_pts: u64,
    pub write_errors: u64,
    /// The encoder returned a negative status on submission or pull
    pub encode_failed: bool,
}

/// Drives the encoder backend for one stream and writes its packets
#[derive(Debug)]
pub struct EncoderAdapter {
    backend: EncoderBackend,
    stream_index: usize,
    encoder_time_base: Rational,
    container_time_base: Rational,
}

impl EncoderAdapter {
    pub fn new(
        backend: EncoderBackend,
        stream_index: usize,
        encoder_time_base: Rational,
        container_time_base: Rational,
    ) -> Self {
        Self {
            backend,
            stream_index,
            encoder_time_base,
            container_time_base,
        }
    }

    /// Submit a frame (`None` flushes) and write every packet it yields.
    ///
    /// `fallback_pts` (encoder ticks) stands in for packets the encoder
    /// emits without a pts. Failures are logged and counted, never returned.
    pub fn submit(
        &mut self,
        frame: Option<&Frame<'_>>,
        fallback_pts: Option<i64>,
        muxer: &mut dyn Muxer,
    ) -> SubmitReport {
        let mut report = SubmitReport::default();
        let stream_index = self.stream_index;
        let from = self.encoder_time_base;
        let to = self.container_time_base;

        let result = self.backend.submit(frame, |mut packet| {
            packet.stream_index = stream_index;
            if retime_packet(&mut packet, fallback_pts, from, to) {
                report.lost_pts += 1;
            }
            match muxer.write_packet(&packet) {
                Ok(()) => {
                    report.packets_written += 1;
                    report.bytes_written += packet.data.len() as u64;
                }
                Err(e) => {
                    tracing::error!(
                        pts = ?packet.pts,
                        time_base = %to,
                        error = %e,
                        "error writing packet"
                    );
                    report.write_errors += 1;
                }
            }
        });

        if let Err(e) = result {
            tracing::error!(
                pts = frame.map(|f| f.pts).unwrap_or(-1),
                time_base = %from,
                error = %e,
                "error encoding frame"
            );
            report.encode_failed = true;
        }

        report
    }
}

/// Rescale a packet's pts, dts and duration from `from` into `to`.
///
/// Returns true when the packet carried no pts and `fallback_pts` was
/// substituted.
fn retime_packet(
    packet: &mut EncodedPacket,
    fallback_pts: Option<i64>,
    from: Rational,
    to: Rational,
) -> bool {
    let lost = packet.pts.is_none();
    packet.pts = match packet.pts {
        Some(pts) => Some(rescale_q(pts, from, to)),
        None => {
            tracing::warn!(?fallback_pts, "encoder lost pts");
            fallback_pts.map(|pts| rescale_q(pts, from, to))
        }
    };
    packet.dts = packet.dts.map(|dts| rescale_q(dts, from, to));
    if let Some(duration) = packet.duration.filter(|&d| d > 0) {
        packet.duration = Some(rescale_q(duration, from, to));
    }
    lost
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::{frame_at, RecordingMuxer, ScriptedPushDrain};

    const ENC: Rational = Rational::new(1, 48000);
    const MS: Rational = Rational::new(1, 1000);

    #[test]
    fn test_retime_packet_to_millis() {
        let mut packet = EncodedPacket::new(vec![1, 2, 3], Some(100)).with_duration(1024);
        let lost = retime_packet(&mut packet, None, ENC, MS);
        assert!(!lost);
        assert_eq!(packet.pts, Some(2));
        assert_eq!(packet.dts, Some(2));
        assert_eq!(packet.duration, Some(21));
    }

    #[test]
    fn test_retime_missing_pts_uses_fallback() {
        let mut packet = EncodedPacket::new(vec![0], None);
        let lost = retime_packet(&mut packet, Some(48_000), ENC, MS);
        assert!(lost);
        assert_eq!(packet.pts, Some(1000));
        assert_eq!(packet.dts, None);
    }

    #[test]
    fn test_retime_keeps_unknown_duration() {
        let mut packet = EncodedPacket::new(vec![0], Some(0)).with_duration(0);
        retime_packet(&mut packet, None, ENC, MS);
        assert_eq!(packet.duration, Some(0));
    }

    #[test]
    fn test_submit_writes_retimed_packets() {
        let mut encoder = ScriptedPushDrain::new();
        encoder.queue_packets(&[0, 48_000]);
        let mut adapter = EncoderAdapter::new(EncoderBackend::push_drain(encoder), 3, ENC, MS);
        let mut muxer = RecordingMuxer::new();

        let data = [0u8; 8];
        let frame = frame_at(&data, 0);
        let report = adapter.submit(Some(&frame), Some(0), &mut muxer);

        assert_eq!(report.packets_written, 2);
        assert!(!report.encode_failed);
        let written = muxer.packets();
        assert_eq!(written[1].pts, Some(1000));
        assert!(written.iter().all(|p| p.stream_index == 3));
    }

    #[test]
    fn test_submit_counts_write_errors() {
        let mut encoder = ScriptedPushDrain::new();
        encoder.queue_packets(&[0, 1024]);
        let mut adapter = EncoderAdapter::new(EncoderBackend::push_drain(encoder), 0, ENC, ENC);
        let mut muxer = RecordingMuxer::new();
        muxer.fail_writes(true);

        let data = [0u8; 8];
        let frame = frame_at(&data, 0);
        let report = adapter.submit(Some(&frame), None, &mut muxer);
        assert_eq!(report.write_errors, 2);
        assert_eq!(report.packets_written, 0);
    }
}
