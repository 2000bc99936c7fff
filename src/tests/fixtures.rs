//! Test fixtures
//!
//! Scripted encoders for both interaction styles, an echo encoder that
//! records every frame it sees, and a muxer that records every packet.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::batch::{Frame, SampleFormat};
use crate::config::{TimestampConfig, TimestampMode};
use crate::encode::{EncodedPacket, Muxer, PushDrainEncoder, SingleCallEncoder};
use crate::error::{CodecError, EncodeError, Result};
use crate::session::Session;

/// Install a test subscriber once; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Mono S16 frame over `data`
pub fn frame_at(data: &[u8], pts: i64) -> Frame<'_> {
    Frame {
        format: SampleFormat::S16,
        channels: 1,
        samples: data.len() / 2,
        pts,
        planes: vec![data],
    }
}

/// Session with the given mode and otherwise default timestamp options
pub fn session_with(mode: TimestampMode, muxer: &RecordingMuxer) -> Arc<Session> {
    let options = TimestampConfig {
        mode,
        ..Default::default()
    };
    Session::new(options, Box::new(muxer.clone()))
}

fn packet(pts: i64) -> EncodedPacket {
    EncodedPacket::new(vec![0xAA; 16], Some(pts))
}

/// Push/drain encoder that replays a fixed script
#[derive(Debug, Default)]
pub struct ScriptedPushDrain {
    queue: VecDeque<EncodedPacket>,
    end: Option<CodecError>,
    send_failure: Option<CodecError>,
}

impl ScriptedPushDrain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_packets(&mut self, pts: &[i64]) {
        self.queue.extend(pts.iter().map(|&p| packet(p)));
    }

    /// Status returned once the queue is empty (default `Again`)
    pub fn end_with(&mut self, status: CodecError) {
        self.end = Some(status);
    }

    pub fn fail_next_send(&mut self, status: CodecError) {
        self.send_failure = Some(status);
    }
}

impl PushDrainEncoder for ScriptedPushDrain {
    fn send_frame(&mut self, _frame: Option<&Frame<'_>>) -> std::result::Result<(), CodecError> {
        match self.send_failure.take() {
            Some(status) => Err(status),
            None => Ok(()),
        }
    }

    fn receive_packet(&mut self) -> std::result::Result<EncodedPacket, CodecError> {
        self.queue
            .pop_front()
            .ok_or(self.end.unwrap_or(CodecError::Again))
    }
}

/// Single-call encoder that hands out one queued packet per call
#[derive(Debug, Default)]
pub struct ScriptedSingleCall {
    queue: VecDeque<EncodedPacket>,
}

impl ScriptedSingleCall {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_packets(&mut self, pts: &[i64]) {
        self.queue.extend(pts.iter().map(|&p| packet(p)));
    }
}

impl SingleCallEncoder for ScriptedSingleCall {
    fn encode(
        &mut self,
        _frame: Option<&Frame<'_>>,
    ) -> std::result::Result<Option<EncodedPacket>, CodecError> {
        Ok(self.queue.pop_front())
    }
}

/// A frame as seen by the echo encoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenFrame {
    pub pts: i64,
    pub samples: usize,
    pub planes: Vec<Vec<u8>>,
}

#[derive(Debug, Default)]
struct EchoState {
    frames: Vec<SeenFrame>,
    flushes: usize,
}

/// Observer half of an [`EchoEncoder`], usable after the encoder is boxed
#[derive(Debug, Clone, Default)]
pub struct EchoLog(Arc<Mutex<EchoState>>);

impl EchoLog {
    pub fn frames(&self) -> Vec<SeenFrame> {
        self.0.lock().frames.clone()
    }

    pub fn flushes(&self) -> usize {
        self.0.lock().flushes
    }
}

/// Encoder that turns every frame into one packet carrying the frame's pts
/// and duration, and records what it was given.
#[derive(Debug, Default)]
pub struct EchoEncoder {
    log: EchoLog,
    pending: VecDeque<EncodedPacket>,
    flushed: bool,
    sent: usize,
    fail_on: Option<usize>,
    tail_without_pts: bool,
}

impl EchoEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> EchoLog {
        self.log.clone()
    }

    /// Reject the `n`th submitted frame (0-based).
    pub fn fail_on_frame(mut self, n: usize) -> Self {
        self.fail_on = Some(n);
        self
    }

    /// Emit one extra packet with no pts when flushed.
    pub fn tail_without_pts(mut self) -> Self {
        self.tail_without_pts = true;
        self
    }

    fn accept(&mut self, frame: Option<&Frame<'_>>) -> std::result::Result<(), CodecError> {
        let Some(frame) = frame else {
            self.log.0.lock().flushes += 1;
            self.flushed = true;
            if self.tail_without_pts {
                self.pending.push_back(EncodedPacket::new(vec![0xEE; 4], None));
            }
            return Ok(());
        };

        let index = self.sent;
        self.sent += 1;
        if self.fail_on == Some(index) {
            return Err(CodecError::Failed(-22));
        }

        self.log.0.lock().frames.push(SeenFrame {
            pts: frame.pts,
            samples: frame.samples,
            planes: frame.planes.iter().map(|p| p.to_vec()).collect(),
        });
        self.pending.push_back(
            EncodedPacket::new(vec![0x55; frame.byte_len().min(64)], Some(frame.pts))
                .with_duration(frame.samples as i64),
        );
        Ok(())
    }
}

impl PushDrainEncoder for EchoEncoder {
    fn send_frame(&mut self, frame: Option<&Frame<'_>>) -> std::result::Result<(), CodecError> {
        self.accept(frame)
    }

    fn receive_packet(&mut self) -> std::result::Result<EncodedPacket, CodecError> {
        match self.pending.pop_front() {
            Some(packet) => Ok(packet),
            None if self.flushed => Err(CodecError::Eof),
            None => Err(CodecError::Again),
        }
    }
}

impl SingleCallEncoder for EchoEncoder {
    fn encode(
        &mut self,
        frame: Option<&Frame<'_>>,
    ) -> std::result::Result<Option<EncodedPacket>, CodecError> {
        self.accept(frame)?;
        Ok(self.pending.pop_front())
    }
}

#[derive(Debug)]
struct MuxerState {
    packets: Vec<EncodedPacket>,
    ready: bool,
    fail_writes: bool,
}

/// Muxer that records written packets.
///
/// Clones share state, so a test keeps one clone to inspect what a boxed
/// copy inside a session received.
#[derive(Debug, Clone)]
pub struct RecordingMuxer(Arc<Mutex<MuxerState>>);

impl RecordingMuxer {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(MuxerState {
            packets: Vec::new(),
            ready: true,
            fail_writes: false,
        })))
    }

    pub fn packets(&self) -> Vec<EncodedPacket> {
        self.0.lock().packets.clone()
    }

    /// Packets written for one stream index
    pub fn stream_packets(&self, stream_index: usize) -> Vec<EncodedPacket> {
        self.0
            .lock()
            .packets
            .iter()
            .filter(|p| p.stream_index == stream_index)
            .cloned()
            .collect()
    }

    pub fn set_ready(&self, ready: bool) {
        self.0.lock().ready = ready;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.0.lock().fail_writes = fail;
    }
}

impl Muxer for RecordingMuxer {
    fn start(&mut self) -> bool {
        self.0.lock().ready
    }

    fn write_packet(&mut self, packet: &EncodedPacket) -> Result<()> {
        let mut state = self.0.lock();
        if state.fail_writes {
            return Err(EncodeError::WritePacket("muxer refused packet".to_string()));
        }
        state.packets.push(packet.clone());
        Ok(())
    }
}
