//! Session wiring
//!
//! The run loop that owns all compositing state and the handle the
//! embedding application drives it through.

pub mod mixer;

pub use mixer::MixerSession;
