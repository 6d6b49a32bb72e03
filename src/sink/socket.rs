//! Outbound socket sink
//!
//! The fallback when no muxer is attached: raw payload bytes go straight
//! over the outbound TCP socket whenever it is open. Units arriving while
//! the socket is closed are dropped silently, never buffered or retried.

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::media::EncodedUnit;

/// Raw-payload sender over a TCP socket
#[derive(Debug)]
pub struct SocketSink {
    stream: Option<TcpStream>,
}

impl SocketSink {
    /// A sink with no socket; everything sent is dropped
    pub fn disconnected() -> Self {
        Self { stream: None }
    }

    /// Connect the sink
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self {
            stream: Some(stream),
        })
    }

    /// Whether the socket is currently open
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Send one unit's payload bytes
    ///
    /// With no open socket this is a silent drop. A write failure closes
    /// the socket (subsequent units are then dropped); it is logged, not
    /// surfaced.
    pub async fn send(&mut self, unit: &EncodedUnit) {
        let Some(stream) = self.stream.as_mut() else {
            return;
        };

        if let Err(e) = stream.write_all(&unit.data).await {
            tracing::warn!(error = %e, "Outbound socket write failed, closing");
            self.stream = None;
        }
    }

    /// Drain a session's output channel into the socket
    ///
    /// Runs until the channel closes (session stopped).
    pub async fn run(mut self, mut units: mpsc::UnboundedReceiver<EncodedUnit>) {
        let mut sent: u64 = 0;
        let mut dropped: u64 = 0;

        while let Some(unit) = units.recv().await {
            if self.is_open() {
                self.send(&unit).await;
                sent += 1;
            } else {
                dropped += 1;
            }
        }

        tracing::info!(sent, dropped, "Outbound sink finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    fn unit(payload: &'static [u8]) -> EncodedUnit {
        EncodedUnit::video("avc1.42e01f", 0, Bytes::from_static(payload), true)
    }

    #[tokio::test]
    async fn test_disconnected_sink_drops_silently() {
        let mut sink = SocketSink::disconnected();
        assert!(!sink.is_open());

        // No panic, no error surface
        sink.send(&unit(b"payload")).await;
    }

    #[tokio::test]
    async fn test_connected_sink_writes_payload() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let accept = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            socket.read_to_end(&mut buf).await.unwrap();
            buf
        });

        let mut sink = SocketSink::connect(addr).await.unwrap();
        assert!(sink.is_open());
        sink.send(&unit(b"abc")).await;
        sink.send(&unit(b"def")).await;
        drop(sink);

        let received = accept.await.unwrap();
        assert_eq!(received, b"abcdef");
    }

    #[tokio::test]
    async fn test_write_failure_closes_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut sink = SocketSink::connect(addr).await.unwrap();

        // Peer goes away; writes eventually fail and the sink closes
        let (socket, _) = listener.accept().await.unwrap();
        drop(socket);
        drop(listener);

        let big = EncodedUnit::video("avc1.42e01f", 0, Bytes::from(vec![0u8; 1 << 20]), false);
        for _ in 0..16 {
            sink.send(&big).await;
            if !sink.is_open() {
                break;
            }
        }
        assert!(!sink.is_open());

        // Further sends are silent drops
        sink.send(&unit(b"late")).await;
    }
}
