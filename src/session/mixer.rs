//! Mixer session
//!
//! Wires the tracker, compositor, mix bus, and encode pulls together.
//! One run-loop task exclusively owns the tracker, layout, intake buffer,
//! and composite surface, so membership changes and ticks can never
//! interleave; per-participant readers and the two encode pulls are
//! separate tasks that talk to it over channels.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::compose::{Compositor, IntakeBuffer};
use crate::config::MixerConfig;
use crate::error::{Error, Result};
use crate::media::{AudioBuffer, EncodedUnit, StreamId, VideoFrame};
use crate::mixer::MixBus;
use crate::pipeline::{
    AudioEncoder, AudioEncoderConfig, AudioPull, VideoEncoder, VideoEncoderConfig, VideoPull,
};
use crate::room::{ParticipantTracker, RoomEvent, StreamTracks};
use crate::stats::{MixStats, MixStatsSnapshot};

enum Command {
    Event(RoomEvent),
    Stop(oneshot::Sender<()>),
}

/// A running mixer session
///
/// Created by [`MixerSession::start`], which also returns the receiver
/// the muxer/sender consumes tagged units from. Feed membership events
/// in with [`handle_event`](Self::handle_event); tear down with
/// [`stop`](Self::stop).
pub struct MixerSession {
    command_tx: mpsc::UnboundedSender<Command>,
    stats: Arc<MixStats>,
    run_handle: JoinHandle<()>,
}

impl MixerSession {
    /// Configure both encoders and start the session
    ///
    /// Encoder configuration happens first and any rejection aborts
    /// startup before a single event is processed. The compositor stays
    /// idle (no tick timer, no encode pulls) until the first confirmed
    /// subscription.
    pub fn start(
        config: MixerConfig,
        mut video_encoder: Box<dyn VideoEncoder>,
        mut audio_encoder: Box<dyn AudioEncoder>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<EncodedUnit>)> {
        video_encoder.configure(&VideoEncoderConfig {
            codec: config.video_codec.clone(),
            width: config.width,
            height: config.height,
            bitrate: config.video_bitrate,
            framerate: config.fps,
        })?;
        audio_encoder.configure(&AudioEncoderConfig {
            codec: config.audio_codec.clone(),
            sample_rate: config.audio_sample_rate,
            channels: config.audio_channels,
        })?;

        let stats = MixStats::new();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (intake_tx, intake_rx) = mpsc::unbounded_channel();
        let (audio_tx, audio_rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, _) = watch::channel(VideoFrame::solid(config.width, config.height, [0, 0, 0, 0xff]));
        let (shutdown_tx, _) = watch::channel(false);

        let ctx = RunCtx {
            compositor: Compositor::new(&config),
            tracker: ParticipantTracker::new(config.width, config.height),
            intake: IntakeBuffer::new(),
            command_rx,
            intake_tx,
            intake_rx,
            audio_tx,
            audio_rx: Some(audio_rx),
            video: Some((video_encoder, VideoPull::new(&config))),
            audio: Some((audio_encoder, AudioPull::new(&config))),
            snapshot_tx,
            shutdown_tx,
            out: out_tx,
            stats: Arc::clone(&stats),
            config,
            reader_handles: Vec::new(),
            pull_handles: Vec::new(),
        };

        let run_handle = tokio::spawn(run_loop(ctx));

        tracing::info!("Mixer session started");

        Ok((
            Self {
                command_tx,
                stats,
                run_handle,
            },
            out_rx,
        ))
    }

    /// Feed a membership event into the session
    pub fn handle_event(&self, event: RoomEvent) -> Result<()> {
        self.command_tx
            .send(Command::Event(event))
            .map_err(|_| Error::SessionClosed)
    }

    /// Current statistics
    pub fn stats(&self) -> MixStatsSnapshot {
        self.stats.snapshot()
    }

    /// Stop the session
    ///
    /// Cancels readers and the tick timer, flushes both encoders (their
    /// buffered units are emitted downstream first), then closes the
    /// output channel.
    pub async fn stop(self) -> Result<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.command_tx
            .send(Command::Stop(ack_tx))
            .map_err(|_| Error::SessionClosed)?;
        ack_rx.await.map_err(|_| Error::SessionClosed)?;
        let _ = self.run_handle.await;
        Ok(())
    }
}

struct RunCtx {
    compositor: Compositor,
    tracker: ParticipantTracker,
    intake: IntakeBuffer,
    command_rx: mpsc::UnboundedReceiver<Command>,
    /// Kept alive so `intake_rx` never reports closed; cloned per reader
    intake_tx: mpsc::UnboundedSender<(StreamId, VideoFrame)>,
    intake_rx: mpsc::UnboundedReceiver<(StreamId, VideoFrame)>,
    audio_tx: mpsc::UnboundedSender<AudioBuffer>,
    /// Handed to the audio pull task on activation
    audio_rx: Option<mpsc::UnboundedReceiver<AudioBuffer>>,
    /// Held until activation, then moved into the video pull task
    video: Option<(Box<dyn VideoEncoder>, VideoPull)>,
    /// Held until activation, then moved into the audio pull task
    audio: Option<(Box<dyn AudioEncoder>, AudioPull)>,
    snapshot_tx: watch::Sender<VideoFrame>,
    shutdown_tx: watch::Sender<bool>,
    out: mpsc::UnboundedSender<EncodedUnit>,
    stats: Arc<MixStats>,
    config: MixerConfig,
    reader_handles: Vec<JoinHandle<()>>,
    pull_handles: Vec<JoinHandle<()>>,
}

async fn run_loop(mut ctx: RunCtx) {
    let started_at = Instant::now();
    let mut ticker: Option<tokio::time::Interval> = None;

    let stop_ack = loop {
        tokio::select! {
            cmd = ctx.command_rx.recv() => match cmd {
                Some(Command::Event(event)) => handle_event(&mut ctx, &mut ticker, event),
                Some(Command::Stop(ack)) => break Some(ack),
                // All handles dropped: treat as stop
                None => break None,
            },
            Some((id, frame)) = ctx.intake_rx.recv() => {
                ctx.intake.push(id, frame);
            },
            _ = tick_ready(&mut ticker) => {
                run_tick(&mut ctx);
            },
        }
    };

    shutdown(ctx, started_at).await;

    if let Some(ack) = stop_ack {
        let _ = ack.send(());
    }
}

/// Resolves on the next tick boundary, or never while idle
async fn tick_ready(ticker: &mut Option<tokio::time::Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

fn handle_event(ctx: &mut RunCtx, ticker: &mut Option<tokio::time::Interval>, event: RoomEvent) {
    match event {
        RoomEvent::StreamAdded { id } => {
            // Subscription is requested by the signaling collaborator;
            // nothing to do until it confirms.
            tracing::debug!(stream = %id, "Stream added");
        }
        RoomEvent::StreamSubscribed { id, tracks } => {
            if !ctx.tracker.add(id.clone()) {
                // Duplicate notification: no second reader, tracks dropped
                return;
            }
            spawn_readers(ctx, id, tracks);

            if ctx.compositor.activate() {
                tracing::info!("Mix started");
                *ticker = Some(tokio::time::interval(ctx.config.tick_period()));
                spawn_pulls(ctx);
            }
        }
        RoomEvent::StreamRemoved { id } => {
            ctx.tracker.remove(&id);
        }
    }
}

/// Spawn per-track reader tasks for a newly subscribed stream
///
/// Each reader forwards decoded units until its track ends; the units'
/// ownership passes to the run loop (video) or the audio pull (audio).
fn spawn_readers(ctx: &mut RunCtx, id: StreamId, tracks: StreamTracks) {
    if let Some(mut video_rx) = tracks.video {
        let intake_tx = ctx.intake_tx.clone();
        let id = id.clone();
        ctx.reader_handles.push(tokio::spawn(async move {
            while let Some(frame) = video_rx.recv().await {
                if intake_tx.send((id.clone(), frame)).is_err() {
                    break;
                }
            }
            tracing::debug!(stream = %id, "Video reader ended");
        }));
    }

    if let Some(mut audio_rx) = tracks.audio {
        let audio_tx = ctx.audio_tx.clone();
        ctx.reader_handles.push(tokio::spawn(async move {
            while let Some(buffer) = audio_rx.recv().await {
                if audio_tx.send(buffer).is_err() {
                    break;
                }
            }
            tracing::debug!(stream = %id, "Audio reader ended");
        }));
    }
}

/// Spawn the two encode pull loops (first subscription only)
fn spawn_pulls(ctx: &mut RunCtx) {
    let start = Instant::now();

    if let Some((encoder, pull)) = ctx.video.take() {
        ctx.pull_handles.push(tokio::spawn(video_pull_loop(
            encoder,
            pull,
            ctx.snapshot_tx.subscribe(),
            ctx.shutdown_tx.subscribe(),
            ctx.out.clone(),
            Arc::clone(&ctx.stats),
            ctx.config.tick_period(),
            start,
        )));
    }

    if let (Some((encoder, pull)), Some(audio_rx)) = (ctx.audio.take(), ctx.audio_rx.take()) {
        ctx.pull_handles.push(tokio::spawn(audio_pull_loop(
            encoder,
            pull,
            MixBus::new(ctx.config.audio_sample_rate, ctx.config.audio_channels),
            audio_rx,
            ctx.shutdown_tx.subscribe(),
            ctx.out.clone(),
            Arc::clone(&ctx.stats),
            ctx.config.audio_block,
            ctx.config.audio_block_frames(),
            start,
        )));
    }
}

fn run_tick(ctx: &mut RunCtx) {
    // Drain whatever reached the intake channel since the last tick
    while let Ok((id, frame)) = ctx.intake_rx.try_recv() {
        ctx.intake.push(id, frame);
    }

    let frames = ctx.intake.drain();
    let report = ctx
        .compositor
        .tick(frames, &mut ctx.tracker, Instant::now());

    MixStats::add(&ctx.stats.frames_drawn, report.drawn as u64);
    MixStats::add(&ctx.stats.frames_dropped, report.dropped as u64);
    MixStats::add(&ctx.stats.placeholders_painted, report.placeholders as u64);
    MixStats::add(&ctx.stats.ticks, 1);

    // Expose the freshly composited canvas to the video pull
    ctx.snapshot_tx.send_replace(ctx.compositor.snapshot());
}

async fn shutdown(mut ctx: RunCtx, started_at: Instant) {
    // Readers cancel at their next yield point
    for handle in &ctx.reader_handles {
        handle.abort();
    }

    // Pull loops observe the signal, flush their encoder, and exit
    ctx.shutdown_tx.send_replace(true);
    for handle in ctx.pull_handles.drain(..) {
        let _ = handle.await;
    }

    // Never activated: the encoders never left the run loop, flush here
    if let Some((mut encoder, mut pull)) = ctx.video.take() {
        for unit in pull.flush(encoder.as_mut()) {
            let _ = ctx.out.send(unit);
        }
    }
    if let Some((mut encoder, mut pull)) = ctx.audio.take() {
        for unit in pull.flush(encoder.as_mut()) {
            let _ = ctx.out.send(unit);
        }
    }

    tracing::info!(
        duration_secs = started_at.elapsed().as_secs(),
        "Mixer session stopped"
    );
}

#[allow(clippy::too_many_arguments)]
async fn video_pull_loop(
    mut encoder: Box<dyn VideoEncoder>,
    mut pull: VideoPull,
    snapshot_rx: watch::Receiver<VideoFrame>,
    mut shutdown_rx: watch::Receiver<bool>,
    out: mpsc::UnboundedSender<EncodedUnit>,
    stats: Arc<MixStats>,
    period: Duration,
    start: Instant,
) {
    let mut ticker = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let frame = snapshot_rx.borrow().clone();
                let timestamp_ms = start.elapsed().as_millis() as u64;
                for unit in pull.pull(encoder.as_mut(), &frame, timestamp_ms) {
                    MixStats::add(&stats.video_units, 1);
                    if unit.is_key {
                        MixStats::add(&stats.key_frames, 1);
                    }
                    if out.send(unit).is_err() {
                        return;
                    }
                }
            }
            _ = shutdown_rx.changed() => {
                for unit in pull.flush(encoder.as_mut()) {
                    let _ = out.send(unit);
                }
                return;
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn audio_pull_loop(
    mut encoder: Box<dyn AudioEncoder>,
    mut pull: AudioPull,
    mut bus: MixBus,
    mut audio_rx: mpsc::UnboundedReceiver<AudioBuffer>,
    mut shutdown_rx: watch::Receiver<bool>,
    out: mpsc::UnboundedSender<EncodedUnit>,
    stats: Arc<MixStats>,
    block: Duration,
    block_frames: usize,
    start: Instant,
) {
    let mut ticker = tokio::time::interval(block);

    loop {
        tokio::select! {
            Some(buffer) = audio_rx.recv() => {
                bus.push(buffer);
            }
            _ = ticker.tick() => {
                let mixed = bus.next_block(block_frames);
                let timestamp_ms = start.elapsed().as_millis() as u64;
                MixStats::add(&stats.audio_blocks, 1);
                for unit in pull.pull(encoder.as_mut(), &mixed, timestamp_ms) {
                    MixStats::add(&stats.audio_units, 1);
                    if out.send(unit).is_err() {
                        return;
                    }
                }
            }
            _ = shutdown_rx.changed() => {
                for unit in pull.flush(encoder.as_mut()) {
                    let _ = out.send(unit);
                }
                return;
            }
        }
    }
}
