//! # mixcast
//!
//! Composites any number of live remote audio/video streams into one
//! mixed output stream ready for re-encoding and forwarding to a
//! streaming server.
//!
//! The core reconciles independently-arriving per-participant media with
//! a single fixed-cadence compositing tick: decoded video frames queue in
//! an intake buffer drained once per tick onto a shared canvas laid out
//! as a dynamic grid; decoded audio sums on a shared mix bus; and two
//! pull loops feed the injected encoders, tagging every encoded unit with
//! kind/codec/timestamp/key-frame metadata before handoff to the
//! muxer/sender.
//!
//! # Architecture
//!
//! ```text
//!  signaling ──RoomEvent──► MixerSession run loop
//!                             │ owns: tracker + layout + intake + surface
//!  participant readers ──────►│ (one task per track, frames via channel)
//!                             │ tick @ fps: drain, draw, placeholders
//!                             ▼
//!                       composite snapshot          mix bus
//!                             │                        │
//!                       video pull @ fps        audio pull @ block
//!                             │  key every gop         │  (forwarding optional)
//!                             └────────► EncodedUnit ◄─┘
//!                                            │
//!                                   muxer / SocketSink
//! ```
//!
//! # Example
//!
//! ```no_run
//! use mixcast::pipeline::{StubAudioEncoder, StubVideoEncoder};
//! use mixcast::room::{RoomEvent, StreamTracks};
//! use mixcast::{MixerConfig, MixerSession, StreamId};
//!
//! # async fn example() -> mixcast::Result<()> {
//! let (session, mut units) = MixerSession::start(
//!     MixerConfig::default(),
//!     Box::new(StubVideoEncoder::new()),
//!     Box::new(StubAudioEncoder::new()),
//! )?;
//!
//! session.handle_event(RoomEvent::StreamSubscribed {
//!     id: StreamId::new("participant-1"),
//!     tracks: StreamTracks::none(),
//! })?;
//!
//! while let Some(unit) = units.recv().await {
//!     println!("{} unit, {} bytes, key={}", unit.media, unit.data.len(), unit.is_key);
//! }
//! # Ok(())
//! # }
//! ```

pub mod compose;
pub mod config;
pub mod error;
pub mod layout;
pub mod media;
pub mod mixer;
pub mod pipeline;
pub mod room;
pub mod session;
pub mod sink;
pub mod stats;

pub use config::MixerConfig;
pub use error::{Error, Result};
pub use media::{EncodedUnit, MediaKind, StreamId};
pub use session::MixerSession;
pub use sink::SocketSink;
pub use stats::MixStatsSnapshot;
