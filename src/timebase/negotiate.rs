//! Worst time base selection
//!
//! When time base A is no finer than time base B, nearest-rounding rescale
//! satisfies `rescale(rescale(x, A, B), B, A) == x` for every integer `x`:
//! the interval `[(x - 0.5) * A, (x + 0.5) * A)` always contains a multiple
//! of B, so the round trip lands back on `x`. Timestamps compared in the
//! coarser base therefore survive conversion into either stream's base.

use std::cmp::Ordering;

use super::rational::Rational;

/// The coarser of the encoder and container time bases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorstTimeBase {
    pub base: Rational,
    /// True when the container stream's base was coarser than the encoder's
    pub is_container: bool,
}

/// Pick the coarser of two time bases. Ties keep the encoder base.
pub fn negotiate(encoder: Rational, container: Rational) -> WorstTimeBase {
    if encoder.cmp_tick(&container) != Ordering::Less {
        tracing::debug!(
            encoder = %encoder,
            container = %container,
            "using encoder time base for pts adjustment; container base is not worse"
        );
        WorstTimeBase {
            base: encoder,
            is_container: false,
        }
    } else {
        tracing::warn!(
            encoder = %encoder,
            container = %container,
            "not using encoder time base for pts adjustment; container base is worse"
        );
        WorstTimeBase {
            base: container,
            is_container: true,
        }
    }
}
