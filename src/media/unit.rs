//! Encoded media units
//!
//! `EncodedChunk` is what an encoder hands back; `EncodedUnit` is the
//! tagged handoff contract to the muxer/sender. Both are cheap to clone
//! via `Bytes` reference counting.

use bytes::Bytes;

use super::frame::MediaKind;

/// Output of an encoder for a single input frame/block
#[derive(Debug, Clone)]
pub struct EncodedChunk {
    /// Timestamp in milliseconds
    pub timestamp_ms: u64,
    /// Encoded payload
    pub data: Bytes,
    /// Whether this chunk is a key frame (video only)
    pub is_key: bool,
    /// One-time decoder configuration payload (sequence header), if the
    /// encoder surfaced one alongside this chunk
    pub decoder_config: Option<Bytes>,
}

impl EncodedChunk {
    /// Create a chunk without decoder configuration
    pub fn new(timestamp_ms: u64, data: Bytes, is_key: bool) -> Self {
        Self {
            timestamp_ms,
            data,
            is_key,
            decoder_config: None,
        }
    }

    /// Attach a decoder configuration payload
    pub fn with_decoder_config(mut self, config: Bytes) -> Self {
        self.decoder_config = Some(config);
        self
    }
}

/// A tagged encoded unit handed to the muxer/sender
///
/// Immutable once produced; ownership transfers downstream on handoff.
#[derive(Debug, Clone)]
pub struct EncodedUnit {
    /// Media kind
    pub media: MediaKind,
    /// Codec identifier (e.g. "avc1.42e01f", "opus")
    pub codec: String,
    /// Timestamp in milliseconds
    pub timestamp_ms: u64,
    /// Raw payload bytes
    pub data: Bytes,
    /// Whether this unit is a sequence/decoder-config header
    pub is_seq: bool,
    /// Whether this unit is a key frame (video only, never set with is_seq)
    pub is_key: bool,
}

impl EncodedUnit {
    /// Create a regular video sample
    pub fn video(codec: impl Into<String>, timestamp_ms: u64, data: Bytes, is_key: bool) -> Self {
        Self {
            media: MediaKind::Video,
            codec: codec.into(),
            timestamp_ms,
            data,
            is_seq: false,
            is_key,
        }
    }

    /// Create a video sequence header unit
    pub fn video_seq_header(codec: impl Into<String>, timestamp_ms: u64, data: Bytes) -> Self {
        Self {
            media: MediaKind::Video,
            codec: codec.into(),
            timestamp_ms,
            data,
            is_seq: true,
            is_key: false,
        }
    }

    /// Create an audio sample
    pub fn audio(codec: impl Into<String>, timestamp_ms: u64, data: Bytes) -> Self {
        Self {
            media: MediaKind::Audio,
            codec: codec.into(),
            timestamp_ms,
            data,
            is_seq: false,
            is_key: false,
        }
    }
}
