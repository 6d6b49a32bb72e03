//! Decoded media types
//!
//! Raw frames and audio buffers as they arrive from per-participant
//! readers, before compositing/mixing. Pixel and sample payloads use
//! `Bytes`/owned vectors so release is an explicit drop, never implicit.

use bytes::Bytes;

/// Unique identifier for a participant's stream
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamId(String);

impl StreamId {
    /// Create a new stream id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StreamId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Media kind of an encoded unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Video
    Video,
    /// Audio
    Audio,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Video => write!(f, "video"),
            MediaKind::Audio => write!(f, "audio"),
        }
    }
}

/// A decoded video frame (RGBA8, row-major, no padding)
///
/// Cheap to clone via `Bytes` reference counting; the pixel memory is
/// released when the last clone is dropped.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// RGBA pixel data, `width * height * 4` bytes
    pub data: Bytes,
}

impl VideoFrame {
    /// Create a frame from raw RGBA data
    ///
    /// Returns `None` if the data length does not match the dimensions.
    pub fn new(width: u32, height: u32, data: Bytes) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Create a frame filled with a single RGBA value (test/demo helper)
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for _ in 0..(width * height) {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data: Bytes::from(data),
        }
    }

    /// Read the pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}

/// A decoded audio buffer (interleaved signed 16-bit samples)
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count
    pub channels: u16,
    /// Interleaved samples, `frames * channels` values
    pub samples: Vec<i16>,
}

impl AudioBuffer {
    /// Create an audio buffer from interleaved samples
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<i16>) -> Self {
        Self {
            sample_rate,
            channels,
            samples,
        }
    }

    /// Number of audio frames (samples per channel)
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }
}
