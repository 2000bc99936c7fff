//! Shared encode session
//!
//! The audio engine and the companion video path stamp frames against one
//! timeline and write into one muxer. Everything they share lives in a
//! `Session` behind a single mutex; a batching call holds the lock from
//! slicing through the last muxer write.

mod reconcile;

pub use reconcile::{ChunkBase, InputPts, Reconciler};

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::config::TimestampConfig;
use crate::encode::Muxer;

/// Which elementary stream a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Audio,
    Video,
}

/// Timestamp state shared by the audio and video paths
#[derive(Debug, Clone, PartialEq)]
pub struct SessionTiming {
    /// Correction added to input pts after a discontinuity; unset until first computed
    pub discontinuity_pts_offset: Option<f64>,
    /// Lowest input pts (after offset) allowed for the next frame
    pub next_in_pts: f64,
    /// Audio samples consumed since `last_audio_in_pts` was recorded
    pub samples_since_last_pts: u64,
    /// Most recent audio pts reported by the player
    pub last_audio_in_pts: Option<f64>,
    /// Playback position minus stamped input time of the latest audio frame
    pub audio_pts_offset: f64,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            discontinuity_pts_offset: None,
            next_in_pts: 0.0,
            samples_since_last_pts: 0,
            last_audio_in_pts: None,
            audio_pts_offset: 0.0,
        }
    }
}

/// State guarded by the session lock
pub struct SessionInner {
    pub timing: SessionTiming,
    muxer: Box<dyn Muxer>,
}

impl SessionInner {
    /// Split borrow of the timeline and the muxer
    pub fn parts(&mut self) -> (&mut SessionTiming, &mut dyn Muxer) {
        (&mut self.timing, self.muxer.as_mut())
    }
}

/// Encode session shared between the audio engine and the video path
pub struct Session {
    options: TimestampConfig,
    inner: Mutex<SessionInner>,
}

impl Session {
    pub fn new(options: TimestampConfig, muxer: Box<dyn Muxer>) -> Arc<Self> {
        Arc::new(Self {
            options,
            inner: Mutex::new(SessionInner {
                timing: SessionTiming::default(),
                muxer,
            }),
        })
    }

    pub fn options(&self) -> &TimestampConfig {
        &self.options
    }

    /// Acquire the session lock; released when the guard drops.
    pub fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock()
    }

    /// Record a fresh audio input pts from the player.
    pub fn set_audio_pts(&self, pts: f64) {
        let mut inner = self.inner.lock();
        inner.timing.last_audio_in_pts = Some(pts);
        inner.timing.samples_since_last_pts = 0;
    }

    /// Copy of the current shared timeline
    pub fn timing(&self) -> SessionTiming {
        self.inner.lock().timing.clone()
    }

    /// Per-stream shift applied to every output pts, in seconds
    pub fn encode_offset(&self, kind: StreamKind) -> f64 {
        match kind {
            StreamKind::Audio => self.options.audio_offset_secs,
            StreamKind::Video => self.options.video_offset_secs,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
