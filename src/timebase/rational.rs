//! Rational numbers for timestamp units

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EncodeError, Result};

/// A time base: `num / den` seconds per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rational {
    pub num: i32,
    pub den: i32,
}

impl Rational {
    pub const fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    /// Time base of one tick per sample at `sample_rate`.
    pub fn per_sample(sample_rate: u32) -> Result<Self> {
        let den = i32::try_from(sample_rate)
            .ok()
            .filter(|&d| d > 0)
            .ok_or(EncodeError::InvalidSampleRate(sample_rate))?;
        Ok(Self::new(1, den))
    }

    /// Reject bases that cannot express a positive tick length.
    pub fn validate(self) -> Result<Self> {
        if self.num <= 0 || self.den <= 0 {
            return Err(EncodeError::InvalidTimeBase {
                num: self.num,
                den: self.den,
            });
        }
        Ok(self)
    }

    /// Convert seconds to the nearest tick, halves rounding up.
    pub fn seconds_to_ticks(self, seconds: f64) -> i64 {
        (seconds * self.den as f64 / self.num as f64 + 0.5).floor() as i64
    }

    /// Compare tick lengths by cross-multiplication.
    ///
    /// `Greater` means `self` is the coarser base.
    pub fn cmp_tick(&self, other: &Rational) -> Ordering {
        let lhs = self.num as i64 * other.den as i64;
        let rhs = other.num as i64 * self.den as i64;
        lhs.cmp(&rhs)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Rescale `ts` from time base `from` to time base `to`, rounding to the
/// nearest tick with halves away from zero.
///
/// Intermediate products are computed in 128 bits; results outside the
/// `i64` range saturate.
pub fn rescale_q(ts: i64, from: Rational, to: Rational) -> i64 {
    let b = from.num as i128 * to.den as i128;
    let c = to.num as i128 * from.den as i128;
    if c == 0 {
        return ts;
    }
    // Keep the divisor positive so rounding stays symmetric around zero.
    let (b, c) = if c < 0 { (-b, -c) } else { (b, c) };
    let product = ts as i128 * b;
    let half = c / 2;
    let scaled = if product < 0 {
        -((-product + half) / c)
    } else {
        (product + half) / c
    };
    scaled.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}
