//! End-of-stream flush

use std::sync::Arc;

use super::AudioEncodeEngine;

impl AudioEncodeEngine {
    /// Flush the encoder and stop accepting audio.
    ///
    /// Sends exactly one flush submission and writes every packet the
    /// encoder still holds. Packets drained without a pts take the pts of
    /// the last submitted frame. Later calls, and later `submit` calls, do
    /// nothing. If the output never became ready, the flush is skipped.
    pub fn shutdown(&mut self) {
        if self.shutdown {
            return;
        }
        self.shutdown = true;

        let session = Arc::clone(&self.session);
        let mut inner = session.lock();
        let (timing, muxer) = inner.parts();

        if !muxer.start() {
            tracing::warn!("not even ready to encode audio at end -> dropped");
            self.stats.not_ready_drops += 1;
            return;
        }

        let flush_secs = self.reconciler.flush_pts(timing, self.expected_next_pts);
        tracing::debug!(
            flush_secs,
            last_frame_pts = ?self.last_frame_pts,
            "flushing audio encoder"
        );

        let report = self.adapter.submit(None, self.last_frame_pts, muxer);
        self.stats.flushes += 1;
        self.stats.record_submit(&report);

        tracing::info!(
            frames = self.stats.frames_encoded,
            packets = self.stats.packets_written,
            bytes = self.stats.bytes_written,
            "audio encode engine shut down"
        );
    }
}
