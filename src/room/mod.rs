//! Room membership
//!
//! Events from the signaling collaborator and the participant lifecycle
//! tracker that absorbs them.

pub mod events;
pub mod tracker;

pub use events::{RoomEvent, StreamTracks};
pub use tracker::{Participant, ParticipantTracker};
