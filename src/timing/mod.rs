//! Per-stream timing state
//!
//! Holds the encoder and container time bases of one audio elementary
//! stream, the lazily negotiated worst time base and the last frame pts
//! admitted by the monotonicity guard.

mod guard;

pub use guard::Admitted;

use crate::error::Result;
use crate::timebase::{negotiate, Rational, WorstTimeBase};

/// Timing of one audio stream, created once at stream setup
#[derive(Debug, Clone)]
pub struct StreamTiming {
    encoder_time_base: Rational,
    container_time_base: Rational,
    worst: Option<WorstTimeBase>,
    last_worst_pts: Option<i64>,
}

impl StreamTiming {
    pub fn new(encoder_time_base: Rational, container_time_base: Rational) -> Result<Self> {
        Ok(Self {
            encoder_time_base: encoder_time_base.validate()?,
            container_time_base: container_time_base.validate()?,
            worst: None,
            last_worst_pts: None,
        })
    }

    pub fn encoder_time_base(&self) -> Rational {
        self.encoder_time_base
    }

    pub fn container_time_base(&self) -> Rational {
        self.container_time_base
    }

    /// Resolve the worst time base on first use; later calls return the
    /// cached value unchanged.
    pub fn worst_time_base(&mut self) -> WorstTimeBase {
        let (encoder, container) = (self.encoder_time_base, self.container_time_base);
        *self
            .worst
            .get_or_insert_with(|| negotiate(encoder, container))
    }
}
