//! Audio mix bus
//!
//! A single shared bus that sums every concurrently-playing source into
//! one continuous signal. Pushing a decoded buffer starts a short-lived
//! playback node immediately; the pull side reads fixed-size interleaved
//! blocks and nodes end naturally once their samples are exhausted.
//! No gain control, ducking, or silence detection.

use crate::media::AudioBuffer;

/// A playing source on the bus
#[derive(Debug)]
struct PlaybackNode {
    samples: Vec<i16>,
    /// Read position into `samples`
    offset: usize,
}

impl PlaybackNode {
    fn exhausted(&self) -> bool {
        self.offset >= self.samples.len()
    }
}

/// The shared mixing bus
///
/// Sample rate and channel count are fixed at creation; pushed buffers
/// are assumed to match (resampling happens upstream of this crate).
#[derive(Debug)]
pub struct MixBus {
    sample_rate: u32,
    channels: u16,
    nodes: Vec<PlaybackNode>,
}

impl MixBus {
    /// Create an empty bus
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
            nodes: Vec::new(),
        }
    }

    /// Bus sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Bus channel count
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Start playing a decoded buffer immediately
    ///
    /// Buffers from one participant mix in their push order; buffers from
    /// different participants have no mutual ordering.
    pub fn push(&mut self, buffer: AudioBuffer) {
        if buffer.samples.is_empty() {
            return;
        }
        self.nodes.push(PlaybackNode {
            samples: buffer.samples,
            offset: 0,
        });
    }

    /// Pull the next block of `frames` mixed audio frames
    ///
    /// Sums all live nodes with i16 saturation, pads with silence where
    /// no node has samples, and drops nodes that finish during the block.
    pub fn next_block(&mut self, frames: usize) -> AudioBuffer {
        let len = frames * self.channels as usize;
        let mut out = vec![0i16; len];

        for node in &mut self.nodes {
            let available = node.samples.len() - node.offset;
            let take = available.min(len);
            for i in 0..take {
                out[i] = out[i].saturating_add(node.samples[node.offset + i]);
            }
            node.offset += take;
        }

        self.nodes.retain(|node| !node.exhausted());

        AudioBuffer::new(self.sample_rate, self.channels, out)
    }

    /// Number of currently-playing nodes
    pub fn live_nodes(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(samples: Vec<i16>) -> AudioBuffer {
        AudioBuffer::new(48_000, 2, samples)
    }

    #[test]
    fn test_silence_when_no_sources() {
        let mut bus = MixBus::new(48_000, 2);
        let block = bus.next_block(4);

        assert_eq!(block.samples, vec![0i16; 8]);
        assert_eq!(block.frames(), 4);
    }

    #[test]
    fn test_single_source_passes_through() {
        let mut bus = MixBus::new(48_000, 2);
        bus.push(buffer(vec![100, -100, 200, -200]));

        let block = bus.next_block(2);
        assert_eq!(block.samples, vec![100, -100, 200, -200]);
    }

    #[test]
    fn test_concurrent_sources_sum() {
        let mut bus = MixBus::new(48_000, 2);
        bus.push(buffer(vec![100, 100, 100, 100]));
        bus.push(buffer(vec![25, -25, 25, -25]));

        let block = bus.next_block(2);
        assert_eq!(block.samples, vec![125, 75, 125, 75]);
    }

    #[test]
    fn test_summation_saturates() {
        let mut bus = MixBus::new(48_000, 1);
        bus.push(buffer(vec![i16::MAX, i16::MIN]));
        bus.push(buffer(vec![1000, -1000]));

        let block = bus.next_block(2);
        assert_eq!(block.samples, vec![i16::MAX, i16::MIN]);
    }

    #[test]
    fn test_node_ends_when_exhausted() {
        let mut bus = MixBus::new(48_000, 1);
        bus.push(buffer(vec![7, 7]));
        assert_eq!(bus.live_nodes(), 1);

        // Node covers half the block, silence after
        let block = bus.next_block(4);
        assert_eq!(block.samples, vec![7, 7, 0, 0]);
        assert_eq!(bus.live_nodes(), 0);
    }

    #[test]
    fn test_node_spans_multiple_blocks() {
        let mut bus = MixBus::new(48_000, 1);
        bus.push(buffer(vec![1, 2, 3, 4, 5, 6]));

        assert_eq!(bus.next_block(4).samples, vec![1, 2, 3, 4]);
        assert_eq!(bus.live_nodes(), 1);
        assert_eq!(bus.next_block(4).samples, vec![5, 6, 0, 0]);
        assert_eq!(bus.live_nodes(), 0);
    }

    #[test]
    fn test_push_mid_stream_mixes_from_block_start() {
        let mut bus = MixBus::new(48_000, 1);
        bus.push(buffer(vec![10, 10, 10, 10]));
        let _ = bus.next_block(2);

        // New source joins between blocks
        bus.push(buffer(vec![5, 5]));
        assert_eq!(bus.next_block(2).samples, vec![15, 15]);
    }

    #[test]
    fn test_empty_buffer_is_dropped() {
        let mut bus = MixBus::new(48_000, 2);
        bus.push(buffer(Vec::new()));
        assert_eq!(bus.live_nodes(), 0);
    }
}
