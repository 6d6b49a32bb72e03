//! Encoder boundary
//!
//! The hardware/software encoders are external collaborators injected as
//! trait objects. `configure` failures are fatal to session startup;
//! `encode` failures mid-session are logged by the pipeline and the
//! session continues degraded. Dropping the trait object closes it.

use crate::error::Result;
use crate::media::{AudioBuffer, EncodedChunk, VideoFrame};

/// Video encoder configuration
#[derive(Debug, Clone)]
pub struct VideoEncoderConfig {
    /// Codec identifier (e.g. "avc1.42e01f")
    pub codec: String,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Target bitrate in bits per second
    pub bitrate: u32,
    /// Frames per second
    pub framerate: u32,
}

/// Audio encoder configuration
#[derive(Debug, Clone)]
pub struct AudioEncoderConfig {
    /// Codec identifier (e.g. "opus")
    pub codec: String,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count
    pub channels: u16,
}

/// A video encoder collaborator
pub trait VideoEncoder: Send {
    /// Configure the encoder; an error here aborts session startup
    fn configure(&mut self, config: &VideoEncoderConfig) -> Result<()>;

    /// Encode one frame, optionally forcing a key frame
    ///
    /// May return zero or more chunks (encoders are allowed to buffer).
    /// A chunk's `decoder_config` carries the one-time sequence header.
    fn encode(
        &mut self,
        frame: &VideoFrame,
        timestamp_ms: u64,
        key_frame: bool,
    ) -> Result<Vec<EncodedChunk>>;

    /// Drain all buffered chunks; blocking from the pipeline's view
    fn flush(&mut self) -> Result<Vec<EncodedChunk>>;
}

/// An audio encoder collaborator
pub trait AudioEncoder: Send {
    /// Configure the encoder; an error here aborts session startup
    fn configure(&mut self, config: &AudioEncoderConfig) -> Result<()>;

    /// Encode one mixed audio block
    fn encode(&mut self, block: &AudioBuffer, timestamp_ms: u64) -> Result<Vec<EncodedChunk>>;

    /// Drain all buffered chunks
    fn flush(&mut self) -> Result<Vec<EncodedChunk>>;
}
