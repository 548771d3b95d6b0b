//! Reassembles arbitrary-length sample deliveries into fixed-size chunks.

use std::sync::Mutex;

use crate::audio::chunk::SampleChunk;
use crate::audio::sample::AudioSample;
use crate::pipeline::Node;

/// Accumulates incoming samples and emits fixed-length chunks.
///
/// The device session delivers PCM in whatever payload sizes its transport
/// chose; the jitter buffer wants uniform chunks. Samples beyond the last
/// whole chunk are held for the next delivery, so nothing is lost across
/// payload boundaries.
pub struct ChunkAssembler<Sample, const CHANNELS: usize, const SAMPLE_RATE: u32> {
    pending: Mutex<Vec<Sample>>,
    chunk_samples: usize,
}

impl<Sample: AudioSample, const CHANNELS: usize, const SAMPLE_RATE: u32>
    ChunkAssembler<Sample, CHANNELS, SAMPLE_RATE>
{
    /// Create an assembler emitting chunks of `chunk_samples` interleaved
    /// samples. The size must cover whole frames.
    pub fn new(chunk_samples: usize) -> Self {
        assert!(
            chunk_samples > 0 && chunk_samples % CHANNELS == 0,
            "chunk size must be a non-zero multiple of channels"
        );

        Self {
            pending: Mutex::new(Vec::with_capacity(chunk_samples * 2)),
            chunk_samples,
        }
    }

    /// Append samples and return every chunk completed by this delivery.
    pub fn append(&self, samples: &[Sample]) -> Vec<SampleChunk<Sample, CHANNELS, SAMPLE_RATE>> {
        let mut pending = self.pending.lock().unwrap();
        pending.extend_from_slice(samples);

        let mut completed = Vec::new();
        while pending.len() >= self.chunk_samples {
            let data: Vec<Sample> = pending.drain(..self.chunk_samples).collect();
            if let Ok(chunk) = SampleChunk::new(data) {
                completed.push(chunk);
            }
        }
        completed
    }

    /// Samples currently held back waiting for a full chunk.
    pub fn pending_samples(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Drop any partially accumulated chunk.
    pub fn reset(&self) {
        self.pending.lock().unwrap().clear();
    }
}

impl<Sample: AudioSample, const CHANNELS: usize, const SAMPLE_RATE: u32> Node
    for ChunkAssembler<Sample, CHANNELS, SAMPLE_RATE>
{
    type Input = Vec<Sample>;
    type Output = Vec<SampleChunk<Sample, CHANNELS, SAMPLE_RATE>>;

    fn process(&self, input: Self::Input) -> Option<Self::Output> {
        let completed = self.append(&input);
        if completed.is_empty() {
            None
        } else {
            Some(completed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestAssembler = ChunkAssembler<i16, 1, 16000>;

    #[test]
    fn test_holds_until_full_chunk() {
        let assembler = TestAssembler::new(160);

        assert!(assembler.append(&[1i16; 100]).is_empty());
        assert_eq!(assembler.pending_samples(), 100);

        let chunks = assembler.append(&[2i16; 100]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].samples_per_channel(), 160);
        assert_eq!(assembler.pending_samples(), 40);
    }

    #[test]
    fn test_large_delivery_yields_multiple_chunks() {
        let assembler = TestAssembler::new(160);

        let chunks = assembler.append(&[0i16; 500]);
        assert_eq!(chunks.len(), 3);
        assert_eq!(assembler.pending_samples(), 20);
    }

    #[test]
    fn test_sample_order_preserved_across_deliveries() {
        let assembler = TestAssembler::new(4);

        let first: Vec<i16> = vec![1, 2, 3];
        let second: Vec<i16> = vec![4, 5, 6, 7, 8];

        assert!(assembler.append(&first).is_empty());
        let chunks = assembler.append(&second);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].data(), &[1, 2, 3, 4]);
        assert_eq!(chunks[1].data(), &[5, 6, 7, 8]);
    }

    #[test]
    fn test_node_emits_only_when_chunks_complete() {
        let assembler = TestAssembler::new(160);

        assert!(assembler.process(vec![0i16; 100]).is_none());
        let chunks = assembler.process(vec![0i16; 100]).unwrap();
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_reset_discards_partial_chunk() {
        let assembler = TestAssembler::new(160);

        assembler.append(&[1i16; 50]);
        assembler.reset();

        assert_eq!(assembler.pending_samples(), 0);
        assert!(assembler.append(&[2i16; 100]).is_empty());
    }
}
