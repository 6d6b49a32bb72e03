//! Shared media types
//!
//! This module provides:
//! - Decoded frame and audio buffer types
//! - Encoded chunk/unit types for the encoder and muxer boundaries

pub mod frame;
pub mod unit;

pub use frame::{AudioBuffer, MediaKind, StreamId, VideoFrame};
pub use unit::{EncodedChunk, EncodedUnit};
