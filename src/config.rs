//! Mixer configuration

use std::time::Duration;

use crate::compose::surface::Color;

/// Default placeholder color for stale participants (solid red)
pub const DEFAULT_PLACEHOLDER_COLOR: Color = Color::rgb(0xff, 0x00, 0x00);

/// Mixer configuration options
#[derive(Debug, Clone)]
pub struct MixerConfig {
    /// Composite canvas width in pixels
    pub width: u32,

    /// Composite canvas height in pixels
    pub height: u32,

    /// Compositing and video encode cadence (frames per second)
    pub fps: u32,

    /// Video codec identifier passed to the encoder (e.g. "avc1.42e01f")
    pub video_codec: String,

    /// Target video bitrate in bits per second
    pub video_bitrate: u32,

    /// Audio codec identifier passed to the encoder (e.g. "opus")
    pub audio_codec: String,

    /// Audio sample rate in Hz
    pub audio_sample_rate: u32,

    /// Audio channel count
    pub audio_channels: u16,

    /// Duration of each audio block pulled from the mix bus
    pub audio_block: Duration,

    /// How long a participant may go without a fresh frame before its
    /// cell is painted with the placeholder color
    pub staleness: Duration,

    /// Placeholder fill color for stale participants
    pub placeholder_color: Color,

    /// Forward encoded audio units downstream
    ///
    /// When disabled the audio encoder still runs but its output is
    /// discarded; this matches the dormant audio path of the upstream
    /// pipeline this crate models.
    pub forward_audio: bool,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 25,
            video_codec: "avc1.42e01f".into(),
            video_bitrate: 2_000_000,
            audio_codec: "opus".into(),
            audio_sample_rate: 48_000,
            audio_channels: 2,
            audio_block: Duration::from_millis(20),
            staleness: Duration::from_millis(3000),
            placeholder_color: DEFAULT_PLACEHOLDER_COLOR,
            forward_audio: false,
        }
    }
}

impl MixerConfig {
    /// Create a config with a custom canvas size
    pub fn with_canvas(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Set the compositing framerate (clamped to at least 1)
    pub fn fps(mut self, fps: u32) -> Self {
        self.fps = fps.max(1);
        self
    }

    /// Set the video codec identifier
    pub fn video_codec(mut self, codec: impl Into<String>) -> Self {
        self.video_codec = codec.into();
        self
    }

    /// Set the video bitrate
    pub fn video_bitrate(mut self, bitrate: u32) -> Self {
        self.video_bitrate = bitrate;
        self
    }

    /// Set the staleness threshold
    pub fn staleness(mut self, staleness: Duration) -> Self {
        self.staleness = staleness;
        self
    }

    /// Set the placeholder color
    pub fn placeholder_color(mut self, color: Color) -> Self {
        self.placeholder_color = color;
        self
    }

    /// Enable forwarding of encoded audio units downstream
    pub fn forward_audio(mut self, forward: bool) -> Self {
        self.forward_audio = forward;
        self
    }

    /// Key-frame interval in frames: one forced key frame every 5 seconds
    pub fn gop_size(&self) -> u64 {
        self.fps as u64 * 5
    }

    /// Compositing tick period (`1000 / fps` ms)
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(1000 / self.fps as u64)
    }

    /// Number of audio frames per pulled block
    pub fn audio_block_frames(&self) -> usize {
        (self.audio_sample_rate as u128 * self.audio_block.as_millis() / 1000) as usize
    }
}
