//! Block encoder backends
//!
//! Encoders come in two interaction styles. Push-then-drain encoders take a
//! frame and are then pulled until they report `Again` (needs more input)
//! or `Eof` (drained after a flush). Single-call encoders take a frame and
//! hand back at most one packet. `EncoderBackend` picks the style once, at
//! construction, and exposes both as "submit, receive zero or more packets".

use crate::batch::Frame;
use crate::encode::EncodedPacket;
use crate::error::CodecError;

/// Encoder driven by submit-then-pull
pub trait PushDrainEncoder: Send {
    /// Submit a frame, or `None` to request the final flush.
    fn send_frame(&mut self, frame: Option<&Frame<'_>>) -> Result<(), CodecError>;

    /// Pull the next packet.
    fn receive_packet(&mut self) -> Result<EncodedPacket, CodecError>;
}

/// Encoder that returns at most one packet per submission
pub trait SingleCallEncoder: Send {
    /// Encode a frame, or flush with `None`.
    fn encode(&mut self, frame: Option<&Frame<'_>>) -> Result<Option<EncodedPacket>, CodecError>;
}

/// Encoder selected at setup time
pub enum EncoderBackend {
    PushDrain(Box<dyn PushDrainEncoder>),
    SingleCall(Box<dyn SingleCallEncoder>),
}

impl EncoderBackend {
    pub fn push_drain(encoder: impl PushDrainEncoder + 'static) -> Self {
        EncoderBackend::PushDrain(Box::new(encoder))
    }

    pub fn single_call(encoder: impl SingleCallEncoder + 'static) -> Self {
        EncoderBackend::SingleCall(Box::new(encoder))
    }

    /// Submit `frame` (`None` flushes) and hand every resulting packet to
    /// `emit`, in encoder order.
    ///
    /// Packets pulled before a failing pull have already been emitted when
    /// the error is returned.
    pub fn submit<F>(&mut self, frame: Option<&Frame<'_>>, mut emit: F) -> Result<(), CodecError>
    where
        F: FnMut(EncodedPacket),
    {
        match self {
            EncoderBackend::PushDrain(encoder) => {
                encoder.send_frame(frame)?;
                loop {
                    match encoder.receive_packet() {
                        Ok(packet) => emit(packet),
                        Err(CodecError::Again) => {
                            if frame.is_none() {
                                tracing::error!("sent flush frame, got EAGAIN");
                            }
                            return Ok(());
                        }
                        Err(CodecError::Eof) => {
                            if frame.is_some() {
                                tracing::error!("sent audio frame, got EOF");
                            }
                            return Ok(());
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
            EncoderBackend::SingleCall(encoder) => {
                if let Some(packet) = encoder.encode(frame)? {
                    emit(packet);
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for EncoderBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncoderBackend::PushDrain(_) => f.write_str("EncoderBackend::PushDrain"),
            EncoderBackend::SingleCall(_) => f.write_str("EncoderBackend::SingleCall"),
        }
    }
}
