//! Encode pipeline
//!
//! This module provides:
//! - The encoder collaborator traits and their configs
//! - The orchestration state for the video and audio pull paths
//! - Stub encoders for demos and tests

pub mod encoder;
pub mod orchestrator;
pub mod stub;

pub use encoder::{AudioEncoder, AudioEncoderConfig, VideoEncoder, VideoEncoderConfig};
pub use orchestrator::{AudioPull, VideoPull};
pub use stub::{StubAudioEncoder, StubVideoEncoder};
