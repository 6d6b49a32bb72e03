//! Room membership events
//!
//! The signaling collaborator feeds these into the session. A subscribed
//! event carries the decoded-media track handles for the new stream;
//! each track is an mpsc receiver that ends (recv returns `None`) when
//! the upstream source stops the track.

use tokio::sync::mpsc;

use crate::media::{AudioBuffer, StreamId, VideoFrame};

/// Decoded-media track handles for a subscribed stream
///
/// Either track may be absent (audio-only or video-only participants).
#[derive(Debug)]
pub struct StreamTracks {
    /// Decoded video frames, in the participant's own arrival order
    pub video: Option<mpsc::Receiver<VideoFrame>>,
    /// Decoded audio buffers, in the participant's own arrival order
    pub audio: Option<mpsc::Receiver<AudioBuffer>>,
}

impl StreamTracks {
    /// Tracks with neither video nor audio
    pub fn none() -> Self {
        Self {
            video: None,
            audio: None,
        }
    }
}

/// An event from the membership/signaling collaborator
#[derive(Debug)]
pub enum RoomEvent {
    /// A remote stream appeared (subscription is requested externally)
    StreamAdded {
        /// The stream's identifier
        id: StreamId,
    },
    /// Subscription confirmed; media is available
    ///
    /// Known to double-fire upstream: duplicates for an already-tracked
    /// id are absorbed by the tracker.
    StreamSubscribed {
        /// The stream's identifier
        id: StreamId,
        /// Track handles for the stream's media
        tracks: StreamTracks,
    },
    /// The stream went away
    StreamRemoved {
        /// The stream's identifier
        id: StreamId,
    },
}
