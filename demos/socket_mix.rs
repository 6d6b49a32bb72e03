//! Mixer demo with synthetic participants
//!
//! Run with: cargo run --example socket_mix [TARGET_ADDR]
//!
//! Examples:
//!   cargo run --example socket_mix                  # units are counted, not sent
//!   cargo run --example socket_mix 127.0.0.1:9000   # raw payloads over TCP
//!
//! Three synthetic participants join one second apart, each pushing
//! solid-color video frames and a quiet tone; the second one stops
//! sending frames after a while so its cell goes to the placeholder
//! color. Ctrl-C stops and flushes the session.

use std::time::Duration;

use tokio::sync::mpsc;

use mixcast::media::{AudioBuffer, VideoFrame};
use mixcast::pipeline::{StubAudioEncoder, StubVideoEncoder};
use mixcast::room::{RoomEvent, StreamTracks};
use mixcast::{MixerConfig, MixerSession, SocketSink, StreamId};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let target = std::env::args().nth(1);

    let config = MixerConfig::default();
    let (session, units) = MixerSession::start(
        config,
        Box::new(StubVideoEncoder::new()),
        Box::new(StubAudioEncoder::new()),
    )?;

    // Downstream consumer: raw socket when a target is given, counter otherwise
    let consumer = match target {
        Some(addr) => {
            let sink = SocketSink::connect(addr.as_str()).await?;
            tracing::info!(addr = %addr, "Sending raw payloads");
            tokio::spawn(sink.run(units))
        }
        None => tokio::spawn(count_units(units)),
    };

    for (i, color) in [[0xff, 0, 0, 0xff], [0, 0xff, 0, 0xff], [0, 0, 0xff, 0xff]]
        .into_iter()
        .enumerate()
    {
        let id = StreamId::new(format!("synthetic-{i}"));
        let tracks = spawn_participant(color, i == 1);
        session.handle_event(RoomEvent::StreamSubscribed { id, tracks })?;
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    tokio::signal::ctrl_c().await?;

    let stats = session.stats();
    tracing::info!(?stats, "Stopping");
    session.stop().await?;
    let _ = consumer.await;

    Ok(())
}

/// A synthetic participant pushing frames at 10 fps and 20 ms tone blocks
///
/// When `goes_quiet` is set the video stops after 5 seconds, leaving the
/// cell to the placeholder.
fn spawn_participant(color: [u8; 4], goes_quiet: bool) -> StreamTracks {
    let (video_tx, video_rx) = mpsc::channel(8);
    let (audio_tx, audio_rx) = mpsc::channel(8);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(100));
        let mut sent = 0u32;
        loop {
            ticker.tick().await;
            if goes_quiet && sent >= 50 {
                return;
            }
            if video_tx
                .send(VideoFrame::solid(160, 120, color))
                .await
                .is_err()
            {
                return;
            }
            sent += 1;
        }
    });

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(20));
        let mut phase = 0usize;
        loop {
            ticker.tick().await;
            let samples: Vec<i16> = (0..960 * 2)
                .map(|i| {
                    let t = (phase + i / 2) as f32 / 48_000.0;
                    ((t * 440.0 * std::f32::consts::TAU).sin() * 2000.0) as i16
                })
                .collect();
            phase += 960;
            if audio_tx
                .send(AudioBuffer::new(48_000, 2, samples))
                .await
                .is_err()
            {
                return;
            }
        }
    });

    StreamTracks {
        video: Some(video_rx),
        audio: Some(audio_rx),
    }
}

async fn count_units(mut units: mpsc::UnboundedReceiver<mixcast::EncodedUnit>) {
    let mut total = 0u64;
    let mut keys = 0u64;
    while let Some(unit) = units.recv().await {
        total += 1;
        if unit.is_key {
            keys += 1;
        }
        if unit.is_seq {
            tracing::info!(bytes = unit.data.len(), "Sequence header");
        }
    }
    tracing::info!(total, keys, "Output closed");
}
