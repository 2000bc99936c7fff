//! Timestamp reconciliation
//!
//! Turns the player's input pts into the pts stamped on each encoder frame.
//! In copyts mode input pts are shifted by a shared discontinuity offset so
//! the output timeline stays continuous when the input jumps.

use super::SessionTiming;
use crate::config::{TimestampConfig, TimestampMode};
use crate::timebase::Rational;

/// Start pts of the arriving chunk, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputPts {
    pub seconds: f64,
    /// The player gave no pts; the engine's expected next pts was used
    pub synthesized: bool,
}

/// Output-side start time of a chunk, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkBase {
    pub seconds: f64,
    /// Size of the jump that forced the discontinuity offset to be recomputed
    pub discontinuity: Option<f64>,
}

/// Computes frame timestamps for one stream against the shared timeline
#[derive(Debug, Clone)]
pub struct Reconciler {
    mode: TimestampMode,
    threshold: f64,
    encode_offset: f64,
}

impl Reconciler {
    pub fn new(options: &TimestampConfig, encode_offset: f64) -> Self {
        Self {
            mode: options.mode,
            threshold: options.discontinuity_threshold_secs,
            encode_offset,
        }
    }

    pub fn mode(&self) -> TimestampMode {
        self.mode
    }

    /// Reconstruct the input pts of the first sample of the arriving chunk.
    pub fn input_pts(
        &self,
        timing: &SessionTiming,
        sample_rate: u32,
        expected_next_pts: f64,
    ) -> InputPts {
        match timing.last_audio_in_pts {
            Some(pts) => InputPts {
                seconds: pts + timing.samples_since_last_pts as f64 / sample_rate as f64,
                synthesized: false,
            },
            None => {
                tracing::warn!(
                    expected_next_pts,
                    "frame without pts; synthesizing pts instead"
                );
                InputPts {
                    seconds: expected_next_pts,
                    synthesized: true,
                }
            }
        }
    }

    /// Apply the discontinuity offset (copyts) and the encode offset to the
    /// chunk's input pts.
    pub fn chunk_base(&self, timing: &mut SessionTiming, pts: f64) -> ChunkBase {
        let mut discontinuity = None;
        let mut seconds = pts;

        if self.mode.tracks_discontinuities() {
            let offset = match timing.discontinuity_pts_offset {
                None => timing.next_in_pts - pts,
                Some(offset) => {
                    let jump = pts + offset - timing.next_in_pts;
                    if jump.abs() > self.threshold {
                        tracing::warn!(
                            jump,
                            "detected an unexpected discontinuity (pts jumped by {:.3} seconds)",
                            jump
                        );
                        discontinuity = Some(jump);
                        timing.next_in_pts - pts
                    } else {
                        offset
                    }
                }
            };
            timing.discontinuity_pts_offset = Some(offset);
            seconds += offset;
        }

        ChunkBase {
            seconds: seconds + self.encode_offset,
            discontinuity,
        }
    }

    /// Stamp one frame.
    ///
    /// `input_secs` is the frame's reconciled input time and `playback_secs`
    /// its playback position. Returns the pts in `time_base` ticks.
    pub fn frame_pts(
        &self,
        timing: &mut SessionTiming,
        input_secs: f64,
        playback_secs: f64,
        time_base: Rational,
    ) -> i64 {
        timing.audio_pts_offset = playback_secs - input_secs;
        if self.mode.uses_input_pts() {
            time_base.seconds_to_ticks(input_secs)
        } else {
            time_base.seconds_to_ticks(playback_secs)
        }
    }

    /// Advance the shared timeline after a batching call consumed `taken`
    /// input samples.
    pub fn advance(&self, timing: &mut SessionTiming, expected_next_pts: f64, taken: usize) {
        if self.mode.tracks_discontinuities() {
            let next = expected_next_pts + timing.discontinuity_pts_offset.unwrap_or(0.0);
            if next > timing.next_in_pts {
                timing.next_in_pts = next;
            }
        }
        timing.samples_since_last_pts += taken as u64;
    }

    /// Timestamp of the terminating flush, in seconds.
    pub fn flush_pts(&self, timing: &SessionTiming, expected_next_pts: f64) -> f64 {
        let mut pts = expected_next_pts;
        if self.mode.tracks_discontinuities() {
            pts += timing.discontinuity_pts_offset.unwrap_or(0.0);
        }
        pts + self.encode_offset
    }
}
