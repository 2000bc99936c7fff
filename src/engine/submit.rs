//! Batching call

use std::sync::Arc;

use super::AudioEncodeEngine;
use crate::batch::Frame;
use crate::encode::Muxer;
use crate::error::Result;
use crate::session::SessionTiming;

impl AudioEncodeEngine {
    /// Encode as many whole frames as `samples` allows.
    ///
    /// `planes` holds one buffer per channel for planar formats, one
    /// interleaved buffer otherwise. Non-final chunks are consumed in whole
    /// frames only and the caller resubmits the remainder; a final chunk is
    /// padded with silence to complete its last frame. Returns the number of
    /// input samples consumed.
    ///
    /// Only malformed buffers are reported as errors. Timestamp anomalies,
    /// encoder failures and muxer failures are logged, counted in
    /// [`stats`](Self::stats) and do not stop the stream.
    pub fn submit(&mut self, planes: &[&[u8]], samples: usize, final_chunk: bool) -> Result<usize> {
        if self.shutdown {
            tracing::trace!(samples, "audio engine shut down, ignoring chunk");
            return Ok(0);
        }
        self.batcher.check_input(planes, samples)?;

        let session = Arc::clone(&self.session);
        let mut inner = session.lock();
        let (timing, muxer) = inner.parts();

        if !muxer.start() {
            tracing::warn!("not ready yet for encoding audio");
            self.stats.not_ready_drops += 1;
            return Ok(0);
        }

        let input = self
            .reconciler
            .input_pts(timing, self.sample_rate, self.expected_next_pts);
        if input.synthesized {
            self.stats.synthesized_pts += 1;
        }

        let padded = (final_chunk && self.batcher.needs_padding(samples))
            .then(|| self.batcher.pad_final(planes, samples));
        let (chunk, chunk_samples) = match &padded {
            Some(padded) => (padded.planes(), padded.samples()),
            None => (planes.to_vec(), samples),
        };

        self.timing.worst_time_base();

        let base = self.reconciler.chunk_base(timing, input.seconds);
        if base.discontinuity.is_some() {
            self.stats.discontinuities += 1;
        }

        let rate = self.sample_rate as f64;
        let mut bufpos = 0;
        for slice in self.batcher.frames(&chunk, chunk_samples) {
            let input_secs = base.seconds + slice.offset as f64 / rate;
            self.encode_frame(timing, muxer, input_secs, slice.planes);
            bufpos = slice.offset + self.batcher.frame_size();
        }

        self.expected_next_pts = input.seconds + bufpos as f64 / rate;
        let taken = bufpos.min(samples);
        self.reconciler
            .advance(timing, self.expected_next_pts, taken);
        drop(inner);

        tracing::trace!(
            samples,
            taken,
            final_chunk,
            expected_next_pts = self.expected_next_pts,
            "audio chunk batched"
        );

        if final_chunk {
            if bufpos < samples {
                tracing::error!(bufpos, samples, "did not write enough data at the end");
                self.stats.short_final_writes += 1;
            }
        } else if bufpos > samples {
            tracing::error!(bufpos, samples, "audio buffer overflow");
            self.stats.overflows += 1;
        }

        Ok(taken)
    }

    /// Stamp, guard and encode one fixed-size frame.
    fn encode_frame(
        &mut self,
        timing: &mut SessionTiming,
        muxer: &mut dyn Muxer,
        input_secs: f64,
        planes: Vec<&[u8]>,
    ) {
        let frame_size = self.batcher.frame_size();
        let playback_secs = self.frame_count as f64 * frame_size as f64 / self.sample_rate as f64;
        self.frame_count += 1;

        let candidate = self.reconciler.frame_pts(
            timing,
            input_secs,
            playback_secs,
            self.timing.encoder_time_base(),
        );
        let admitted = self.timing.admit(candidate);
        if admitted.corrected {
            self.stats.pts_autocorrections += 1;
        }

        let frame = Frame {
            format: self.batcher.format(),
            channels: self.batcher.channels(),
            samples: frame_size,
            pts: admitted.pts,
            planes,
        };
        self.last_frame_pts = Some(frame.pts);
        let report = self.adapter.submit(Some(&frame), Some(frame.pts), muxer);
        self.stats.frames_encoded += 1;
        self.stats.record_submit(&report);
    }
}
