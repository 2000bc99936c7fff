//! Engine statistics
//!
//! Every anomaly the engine corrects or drops is logged and also counted
//! here, so hosts can surface totals without scraping logs.

use serde::Serialize;

use crate::encode::SubmitReport;

/// Counters for one audio engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    /// Frames handed to the encoder
    pub frames_encoded: u64,
    /// Packets accepted by the muxer
    pub packets_written: u64,
    /// Payload bytes accepted by the muxer
    pub bytes_written: u64,
    /// Terminating flush submissions
    pub flushes: u64,
    /// Frame pts pushed forward by the monotonicity guard
    pub pts_autocorrections: u64,
    /// Input pts jumps beyond the discontinuity threshold
    pub discontinuities: u64,
    /// Batching calls that had no input pts
    pub synthesized_pts: u64,
    /// Packets the encoder emitted without a pts
    pub lost_pts: u64,
    /// Submissions that hit a negative encoder status
    pub encode_errors: u64,
    /// Packets the muxer refused
    pub write_errors: u64,
    /// Final chunks that left samples unwritten
    pub short_final_writes: u64,
    /// Non-final chunks that consumed more than supplied
    pub overflows: u64,
    /// Calls dropped because the output was not ready
    pub not_ready_drops: u64,
}

impl EngineStats {
    /// Fold one encoder submission into the totals.
    pub(crate) fn record_submit(&mut self, report: &SubmitReport) {
        self.packets_written += report.packets_written;
        self.bytes_written += report.bytes_written;
        self.lost_pts += report.lost_pts;
        self.write_errors += report.write_errors;
        if report.encode_failed {
            self.encode_errors += 1;
        }
    }
}
