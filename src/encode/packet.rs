use bytes::Bytes;

use crate::error::Result;

/// An encoded packet.
///
/// Timestamps are in the encoder's time base when emitted and in the
/// container stream's time base once the adapter hands the packet on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPacket {
    pub data: Bytes,
    pub pts: Option<i64>,
    pub dts: Option<i64>,
    pub duration: Option<i64>,
    /// Output stream index, set by the adapter
    pub stream_index: usize,
}

impl EncodedPacket {
    pub fn new(data: impl Into<Bytes>, pts: Option<i64>) -> Self {
        Self {
            data: data.into(),
            pts,
            dts: pts,
            duration: None,
            stream_index: 0,
        }
    }

    pub fn with_dts(mut self, dts: Option<i64>) -> Self {
        self.dts = dts;
        self
    }

    pub fn with_duration(mut self, duration: i64) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// Container writer shared by all streams of a session
pub trait Muxer: Send {
    /// Prepare the output for writing (header, stream setup).
    ///
    /// Returns false while the output cannot accept packets yet, for example
    /// because not every expected stream has been added.
    fn start(&mut self) -> bool;

    /// Write one packet; timestamps are in the stream's container time base.
    fn write_packet(&mut self, packet: &EncodedPacket) -> Result<()>;
}
