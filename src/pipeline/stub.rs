//! Stub encoders
//!
//! Pass-through encoders for demos and tests: no real compression, just
//! the contract. The video stub surfaces a fake decoder configuration on
//! its first chunk the way a real codec surfaces its sequence header.

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::media::{AudioBuffer, EncodedChunk, VideoFrame};

use super::encoder::{AudioEncoder, AudioEncoderConfig, VideoEncoder, VideoEncoderConfig};

/// Video encoder stub
#[derive(Debug, Default)]
pub struct StubVideoEncoder {
    configured: bool,
    first_chunk: bool,
}

impl StubVideoEncoder {
    /// Create an unconfigured stub
    pub fn new() -> Self {
        Self {
            configured: false,
            first_chunk: true,
        }
    }
}

impl VideoEncoder for StubVideoEncoder {
    fn configure(&mut self, config: &VideoEncoderConfig) -> Result<()> {
        if config.width == 0 || config.height == 0 {
            return Err(Error::EncoderConfig("zero canvas dimension".into()));
        }
        self.configured = true;
        Ok(())
    }

    fn encode(
        &mut self,
        frame: &VideoFrame,
        timestamp_ms: u64,
        key_frame: bool,
    ) -> Result<Vec<EncodedChunk>> {
        if !self.configured {
            return Err(Error::Encoder("encode before configure".into()));
        }

        // "Payload" is the raw pixels; good enough to exercise the pipeline
        let mut chunk = EncodedChunk::new(timestamp_ms, frame.data.clone(), key_frame);
        if self.first_chunk {
            self.first_chunk = false;
            chunk = chunk.with_decoder_config(Bytes::from_static(b"stub-seq-header"));
        }
        Ok(vec![chunk])
    }

    fn flush(&mut self) -> Result<Vec<EncodedChunk>> {
        Ok(Vec::new())
    }
}

/// Audio encoder stub
#[derive(Debug, Default)]
pub struct StubAudioEncoder {
    configured: bool,
}

impl StubAudioEncoder {
    /// Create an unconfigured stub
    pub fn new() -> Self {
        Self { configured: false }
    }
}

impl AudioEncoder for StubAudioEncoder {
    fn configure(&mut self, config: &AudioEncoderConfig) -> Result<()> {
        if config.channels == 0 {
            return Err(Error::EncoderConfig("zero channel count".into()));
        }
        self.configured = true;
        Ok(())
    }

    fn encode(&mut self, block: &AudioBuffer, timestamp_ms: u64) -> Result<Vec<EncodedChunk>> {
        if !self.configured {
            return Err(Error::Encoder("encode before configure".into()));
        }

        let mut data = Vec::with_capacity(block.samples.len() * 2);
        for sample in &block.samples {
            data.extend_from_slice(&sample.to_le_bytes());
        }
        Ok(vec![EncodedChunk::new(timestamp_ms, Bytes::from(data), false)])
    }

    fn flush(&mut self) -> Result<Vec<EncodedChunk>> {
        Ok(Vec::new())
    }
}
