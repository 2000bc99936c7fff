//! Monotonicity guard
//!
//! Block encoders require strictly increasing pts per stream, but the
//! companion video path may advance the shared timeline slower than audio.
//! Candidate pts are compared in the worst time base and pushed one worst
//! tick past the previous frame when they fail to increase.

use super::StreamTiming;
use crate::timebase::rescale_q;

/// Outcome of admitting one frame pts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admitted {
    /// Pts to stamp on the frame, in encoder ticks
    pub pts: i64,
    /// Same instant in worst time base ticks
    pub worst_pts: i64,
    pub corrected: bool,
}

impl StreamTiming {
    /// Admit a candidate frame pts (encoder ticks), repairing it if it does
    /// not move past the previously admitted frame.
    pub fn admit(&mut self, candidate: i64) -> Admitted {
        let worst = self.worst_time_base().base;
        let encoder = self.encoder_time_base;

        let mut pts = candidate;
        let mut worst_pts = rescale_q(candidate, encoder, worst);
        let mut corrected = false;

        if let Some(last) = self.last_worst_pts {
            if worst_pts <= last {
                // video pts failing to increase fast enough to match audio
                tracing::warn!(
                    pts = candidate,
                    last,
                    "audio frame pts went backwards, autofixed"
                );
                worst_pts = last + 1;
                pts = rescale_q(worst_pts, worst, encoder);
                corrected = true;
            }
        }
        self.last_worst_pts = Some(worst_pts);

        Admitted {
            pts,
            worst_pts,
            corrected,
        }
    }
}
