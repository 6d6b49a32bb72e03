//! Audio mixing

pub mod bus;

pub use bus::MixBus;
