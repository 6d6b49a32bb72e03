//! Muxer/sender boundary
//!
//! Encoded units leave the core through a channel; this module provides
//! the raw-socket fallback sender used when no muxer is attached.

pub mod socket;

pub use socket::SocketSink;
