//! Push/drain encoder over an FFmpeg audio codec context

use ffmpeg_next as ffmpeg;
use ffmpeg_next::codec;
use ffmpeg_next::ChannelLayout;

use crate::batch::{Frame, SampleFormat, MAX_PLANES};
use crate::encode::{EncodedPacket, PushDrainEncoder};
use crate::engine::AudioStreamSetup;
use crate::error::{CodecError, EncodeError, Result};
use crate::timebase::Rational;

/// Default layout for a channel count
fn channel_layout(channels: usize) -> Result<ChannelLayout> {
    match channels {
        1 => Ok(ChannelLayout::MONO),
        2 => Ok(ChannelLayout::STEREO),
        3..=MAX_PLANES => Ok(ChannelLayout::default(channels as i32)),
        _ => Err(EncodeError::UnsupportedChannelLayout(channels)),
    }
}

fn codec_error(e: ffmpeg::Error) -> CodecError {
    match e {
        ffmpeg::Error::Other { errno } if errno == ffmpeg::error::EAGAIN => CodecError::Again,
        ffmpeg::Error::Eof => CodecError::Eof,
        e => CodecError::Failed(i32::from(e)),
    }
}

/// Audio encoder backed by a real FFmpeg codec context
pub struct LavcAudioEncoder {
    encoder: ffmpeg::encoder::Audio,
    format: SampleFormat,
    channels: usize,
    sample_rate: u32,
    layout: ChannelLayout,
    time_base: Rational,
}

impl LavcAudioEncoder {
    /// Open an encoder for `codec_id` at the given parameters.
    pub fn open(
        codec_id: codec::Id,
        sample_rate: u32,
        channels: usize,
        format: SampleFormat,
        bit_rate: usize,
    ) -> Result<Self> {
        let codec = codec::encoder::find(codec_id).ok_or_else(|| {
            EncodeError::Ffmpeg(format!("{:?} encoder not found in this FFmpeg build", codec_id))
        })?;
        let layout = channel_layout(channels)?;
        let time_base = Rational::per_sample(sample_rate)?;

        let mut context = codec::Context::new_with_codec(codec);
        context.set_time_base(ffmpeg::Rational::from(time_base));

        let mut audio_enc = context
            .encoder()
            .audio()
            .map_err(|e| EncodeError::Ffmpeg(format!("Cannot get audio encoder handle: {}", e)))?;

        audio_enc.set_rate(time_base.den);
        audio_enc.set_format(format.into());
        audio_enc.set_channel_layout(layout);
        audio_enc.set_bit_rate(bit_rate);

        let encoder = audio_enc
            .open_as(codec)
            .map_err(|e| EncodeError::Ffmpeg(format!("Failed to open {:?} encoder: {}", codec_id, e)))?;

        tracing::debug!(
            codec = ?codec_id,
            sample_rate,
            channels,
            frame_size = encoder.frame_size(),
            "opened audio encoder"
        );

        Ok(Self {
            encoder,
            format,
            channels,
            sample_rate,
            layout,
            time_base,
        })
    }

    /// Frame size reported by the codec; 0 when it accepts any size
    pub fn frame_size(&self) -> usize {
        self.encoder.frame_size() as usize
    }

    /// Encoder time base (one tick per sample)
    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    /// Stream setup for an engine driving this encoder.
    pub fn stream_setup(
        &self,
        stream_index: usize,
        container_time_base: Rational,
    ) -> Result<AudioStreamSetup> {
        Ok(
            AudioStreamSetup::new(self.sample_rate, self.channels, self.format, self.frame_size())?
                .with_stream_index(stream_index)
                .with_encoder_time_base(self.time_base)
                .with_container_time_base(container_time_base),
        )
    }

    /// Codec parameters for the encoded stream (for muxer stream setup).
    pub fn codec_parameters(&self) -> codec::Parameters {
        codec::Parameters::from(&self.encoder)
    }

    fn to_av_frame(&self, frame: &Frame<'_>) -> ffmpeg::util::frame::Audio {
        let mut av_frame =
            ffmpeg::util::frame::Audio::new(self.format.into(), frame.samples, self.layout);
        av_frame.set_rate(self.sample_rate);
        av_frame.set_pts(Some(frame.pts));
        for (index, plane) in frame.planes.iter().enumerate() {
            av_frame.data_mut(index)[..plane.len()].copy_from_slice(plane);
        }
        av_frame
    }
}

impl PushDrainEncoder for LavcAudioEncoder {
    fn send_frame(&mut self, frame: Option<&Frame<'_>>) -> std::result::Result<(), CodecError> {
        match frame {
            Some(frame) => {
                let av_frame = self.to_av_frame(frame);
                self.encoder.send_frame(&av_frame).map_err(codec_error)
            }
            None => self.encoder.send_eof().map_err(codec_error),
        }
    }

    fn receive_packet(&mut self) -> std::result::Result<EncodedPacket, CodecError> {
        let mut packet = ffmpeg::codec::packet::Packet::empty();
        self.encoder.receive_packet(&mut packet).map_err(codec_error)?;

        let data = packet.data().map(|d| d.to_vec()).unwrap_or_default();
        let mut encoded = EncodedPacket::new(data, packet.pts()).with_dts(packet.dts());
        if packet.duration() > 0 {
            encoded = encoded.with_duration(packet.duration());
        }
        Ok(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_layout_limits() {
        assert!(channel_layout(2).is_ok());
        assert!(matches!(channel_layout(0), Err(EncodeError::UnsupportedChannelLayout(0))));
        assert!(matches!(
            channel_layout(9),
            Err(EncodeError::UnsupportedChannelLayout(9))
        ));
    }

    #[test]
    fn test_codec_error_mapping() {
        assert_eq!(codec_error(ffmpeg::Error::Eof), CodecError::Eof);
        assert_eq!(
            codec_error(ffmpeg::Error::Other {
                errno: ffmpeg::error::EAGAIN
            }),
            CodecError::Again
        );
    }

    #[test]
    fn test_open_aac_encoder() {
        crate::ffmpeg_utils::init().unwrap();
        if codec::encoder::find(codec::Id::AAC).is_none() {
            return;
        }
        let enc = LavcAudioEncoder::open(codec::Id::AAC, 48000, 2, SampleFormat::F32P, 128_000)
            .unwrap();
        assert_eq!(enc.frame_size(), 1024);
        assert_eq!(enc.time_base(), Rational::new(1, 48000));
    }
}
