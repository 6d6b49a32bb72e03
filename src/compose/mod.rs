//! Compositing
//!
//! This module provides:
//! - The composite surface and its drawing primitives
//! - The per-tick frame intake buffer
//! - The fixed-cadence compositor itself

pub mod compositor;
pub mod intake;
pub mod surface;

pub use compositor::{Compositor, CompositorState, TickReport};
pub use intake::{IntakeBuffer, PendingFrame};
pub use surface::{Color, Surface};
