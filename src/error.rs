use thiserror::Error;

/// Main error type for the audio encode engine
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The channel count needs more data planes than an encoder frame can carry
    #[error("Too many channels: {channels} planes requested, limit is {limit}")]
    TooManyChannels { channels: usize, limit: usize },

    /// A time base with a zero or negative term was supplied
    #[error("Invalid time base: {num}/{den}")]
    InvalidTimeBase { num: i32, den: i32 },

    /// The encoder frame size resolved to zero samples
    #[error("Invalid frame size: {0}")]
    InvalidFrameSize(usize),

    /// The stream sample rate is zero
    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(u32),

    /// The backend cannot describe this channel count
    #[error("Unsupported channel layout: {0} channels")]
    UnsupportedChannelLayout(usize),

    /// The submitted buffer has the wrong number of planes for the sample format
    #[error("Plane count mismatch: expected {expected}, got {actual}")]
    PlaneCount { expected: usize, actual: usize },

    /// A submitted plane is shorter than the declared sample count
    #[error("Plane {plane} holds {actual} bytes, {needed} needed")]
    ShortPlane {
        plane: usize,
        needed: usize,
        actual: usize,
    },

    /// The muxer refused a packet
    #[error("Failed to write packet: {0}")]
    WritePacket(String),

    /// A standard I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Configuration serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// An error originating from the underlying FFmpeg library
    #[cfg(feature = "ffmpeg")]
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),
}

/// Status reported by a block encoder on submission or pull
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// No packet is available right now; more input is needed
    #[error("encoder needs more input")]
    Again,

    /// The encoder is fully drained and will never emit another packet
    #[error("encoder reached end of stream")]
    Eof,

    /// A negative status from the encoder
    #[error("encoder failed with status {0}")]
    Failed(i32),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, EncodeError>;
