//! Encode orchestration
//!
//! Tagging state for the two pull paths. `VideoPull` owns the key-frame
//! cadence (one forced key frame per GOP, the very first frame included)
//! and forwards the codec's decoder configuration exactly once, before
//! any regular sample. `AudioPull` encodes every block but only hands
//! units downstream when audio forwarding is enabled.
//!
//! Mid-stream encoder errors are logged and swallowed here: the session
//! keeps running degraded, with no retry or re-configuration.

use crate::config::MixerConfig;
use crate::media::{AudioBuffer, EncodedUnit, VideoFrame};

use super::encoder::{AudioEncoder, VideoEncoder};

/// Video pull path state
#[derive(Debug)]
pub struct VideoPull {
    codec: String,
    gop_size: u64,
    frame_counter: u64,
    seq_sent: bool,
}

impl VideoPull {
    /// Create the video pull state from config
    pub fn new(config: &MixerConfig) -> Self {
        Self {
            codec: config.video_codec.clone(),
            gop_size: config.gop_size(),
            seq_sent: false,
            frame_counter: 0,
        }
    }

    /// Whether the next frame will be encoded as a key frame
    pub fn next_is_key(&self) -> bool {
        self.frame_counter % self.gop_size == 0
    }

    /// Encode one pulled composite frame and tag the resulting units
    ///
    /// Returns the units to hand downstream, in order. Encoder errors
    /// yield an empty batch.
    pub fn pull(
        &mut self,
        encoder: &mut dyn VideoEncoder,
        frame: &VideoFrame,
        timestamp_ms: u64,
    ) -> Vec<EncodedUnit> {
        let key_frame = self.next_is_key();
        self.frame_counter += 1;

        match encoder.encode(frame, timestamp_ms, key_frame) {
            Ok(chunks) => {
                let mut units = Vec::with_capacity(chunks.len() + 1);
                for chunk in chunks {
                    if !self.seq_sent {
                        if let Some(config) = &chunk.decoder_config {
                            units.push(EncodedUnit::video_seq_header(
                                self.codec.clone(),
                                chunk.timestamp_ms,
                                config.clone(),
                            ));
                            self.seq_sent = true;
                        }
                    }
                    units.push(EncodedUnit::video(
                        self.codec.clone(),
                        chunk.timestamp_ms,
                        chunk.data,
                        chunk.is_key,
                    ));
                }
                units
            }
            Err(e) => {
                tracing::error!(error = %e, "Video encoder error");
                Vec::new()
            }
        }
    }

    /// Flush the encoder and tag whatever it still held
    pub fn flush(&mut self, encoder: &mut dyn VideoEncoder) -> Vec<EncodedUnit> {
        match encoder.flush() {
            Ok(chunks) => chunks
                .into_iter()
                .map(|chunk| {
                    EncodedUnit::video(self.codec.clone(), chunk.timestamp_ms, chunk.data, chunk.is_key)
                })
                .collect(),
            Err(e) => {
                tracing::error!(error = %e, "Video encoder flush error");
                Vec::new()
            }
        }
    }

    /// Frames encoded so far
    pub fn frames_encoded(&self) -> u64 {
        self.frame_counter
    }
}

/// Audio pull path state
#[derive(Debug)]
pub struct AudioPull {
    codec: String,
    forward: bool,
}

impl AudioPull {
    /// Create the audio pull state from config
    pub fn new(config: &MixerConfig) -> Self {
        Self {
            codec: config.audio_codec.clone(),
            forward: config.forward_audio,
        }
    }

    /// Encode one pulled mix block
    ///
    /// The encoder always runs; the result is only handed downstream
    /// when forwarding is enabled.
    pub fn pull(
        &mut self,
        encoder: &mut dyn AudioEncoder,
        block: &AudioBuffer,
        timestamp_ms: u64,
    ) -> Vec<EncodedUnit> {
        match encoder.encode(block, timestamp_ms) {
            Ok(chunks) => {
                if !self.forward {
                    return Vec::new();
                }
                chunks
                    .into_iter()
                    .map(|chunk| {
                        EncodedUnit::audio(self.codec.clone(), chunk.timestamp_ms, chunk.data)
                    })
                    .collect()
            }
            Err(e) => {
                tracing::error!(error = %e, "Audio encoder error");
                Vec::new()
            }
        }
    }

    /// Flush the encoder
    pub fn flush(&mut self, encoder: &mut dyn AudioEncoder) -> Vec<EncodedUnit> {
        match encoder.flush() {
            Ok(chunks) => {
                if !self.forward {
                    return Vec::new();
                }
                chunks
                    .into_iter()
                    .map(|chunk| {
                        EncodedUnit::audio(self.codec.clone(), chunk.timestamp_ms, chunk.data)
                    })
                    .collect()
            }
            Err(e) => {
                tracing::error!(error = %e, "Audio encoder flush error");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::encoder::{AudioEncoderConfig, VideoEncoderConfig};
    use crate::pipeline::stub::{StubAudioEncoder, StubVideoEncoder};

    fn config() -> MixerConfig {
        MixerConfig::with_canvas(2, 2)
    }

    fn video_encoder() -> StubVideoEncoder {
        let mut enc = StubVideoEncoder::new();
        enc.configure(&VideoEncoderConfig {
            codec: "avc1.42e01f".into(),
            width: 2,
            height: 2,
            bitrate: 2_000_000,
            framerate: 25,
        })
        .unwrap();
        enc
    }

    fn frame() -> VideoFrame {
        VideoFrame::solid(2, 2, [0, 0, 0, 0xff])
    }

    #[test]
    fn test_first_frame_is_key_and_seq_precedes_it() {
        let mut pull = VideoPull::new(&config());
        let mut enc = video_encoder();

        let units = pull.pull(&mut enc, &frame(), 0);

        // Sequence header first, then the key sample
        assert_eq!(units.len(), 2);
        assert!(units[0].is_seq);
        assert!(!units[0].is_key);
        assert!(!units[1].is_seq);
        assert!(units[1].is_key);
    }

    #[test]
    fn test_seq_header_only_once() {
        let mut pull = VideoPull::new(&config());
        let mut enc = video_encoder();

        let _ = pull.pull(&mut enc, &frame(), 0);
        let units = pull.pull(&mut enc, &frame(), 40);

        assert_eq!(units.len(), 1);
        assert!(!units[0].is_seq);
    }

    #[test]
    fn test_key_frame_cadence() {
        // fps 25 -> gop 125: exactly one key per 125-frame window
        let mut pull = VideoPull::new(&config());
        let mut enc = video_encoder();

        let mut keys = Vec::new();
        for i in 0..250u64 {
            let units = pull.pull(&mut enc, &frame(), i * 40);
            for unit in units.iter().filter(|u| !u.is_seq) {
                if unit.is_key {
                    keys.push(i);
                }
            }
        }

        assert_eq!(keys, vec![0, 125]);
        assert_eq!(pull.frames_encoded(), 250);
    }

    #[test]
    fn test_encoder_error_is_absorbed() {
        let mut pull = VideoPull::new(&config());
        // Unconfigured stub fails every encode
        let mut enc = StubVideoEncoder::new();

        let units = pull.pull(&mut enc, &frame(), 0);
        assert!(units.is_empty());

        // Counter still advances; cadence is wall-clock based, not
        // success based
        assert_eq!(pull.frames_encoded(), 1);
    }

    #[test]
    fn test_audio_not_forwarded_by_default() {
        let mut pull = AudioPull::new(&config());
        let mut enc = StubAudioEncoder::new();
        enc.configure(&AudioEncoderConfig {
            codec: "opus".into(),
            sample_rate: 48_000,
            channels: 2,
        })
        .unwrap();

        let block = AudioBuffer::new(48_000, 2, vec![1i16; 32]);
        assert!(pull.pull(&mut enc, &block, 20).is_empty());
    }

    #[test]
    fn test_audio_forwarded_when_enabled() {
        let mut pull = AudioPull::new(&config().forward_audio(true));
        let mut enc = StubAudioEncoder::new();
        enc.configure(&AudioEncoderConfig {
            codec: "opus".into(),
            sample_rate: 48_000,
            channels: 2,
        })
        .unwrap();

        let block = AudioBuffer::new(48_000, 2, vec![1i16; 32]);
        let units = pull.pull(&mut enc, &block, 20);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].timestamp_ms, 20);
    }
}
