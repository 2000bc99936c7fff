//! Rational time bases
//!
//! A time base is the number of seconds per timestamp tick. Two are in play
//! for every audio stream: the encoder's (frames are stamped in it) and the
//! container stream's (packets are written in it). This module provides:
//! - `Rational` with nearest-rounding rescale between bases
//! - One-time selection of the coarser ("worst") base of the two

mod negotiate;
mod rational;

pub use negotiate::{negotiate, WorstTimeBase};
pub use rational::{rescale_q, Rational};
