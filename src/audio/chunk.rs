use std::time::Duration;

use anyhow::{Context, Result};
use rkyv::{Archive, Deserialize, Serialize};

/// A type-safe chunk of PCM samples with compile-time channel count and
/// sample rate.
///
/// The length is checked at construction to be a whole number of interleaved
/// frames. The chunk is immutable once built; buffering components pass it
/// through without inspecting the samples.
#[derive(Archive, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[rkyv(compare(PartialEq))]
pub struct SampleChunk<Sample, const CHANNELS: usize, const SAMPLE_RATE: u32> {
    data: Vec<Sample>,
}

impl<Sample, const CHANNELS: usize, const SAMPLE_RATE: u32>
    SampleChunk<Sample, CHANNELS, SAMPLE_RATE>
{
    /// Create a new chunk from raw interleaved samples.
    ///
    /// Returns an error if the data length is not a multiple of the channel
    /// count.
    pub fn new(data: Vec<Sample>) -> Result<Self> {
        if !data.is_empty() && data.len() % CHANNELS != 0 {
            anyhow::bail!(
                "Data length {} must be a multiple of channels {}",
                data.len(),
                CHANNELS
            );
        }
        Ok(Self { data })
    }

    /// Returns the number of samples per channel.
    pub fn samples_per_channel(&self) -> usize {
        self.data.len() / CHANNELS
    }

    /// Returns the number of channels.
    pub const fn channels(&self) -> usize {
        CHANNELS
    }

    /// Returns the sample rate.
    pub const fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    /// Playback duration of this chunk at the declared sample rate.
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples_per_channel() as f64 / SAMPLE_RATE as f64)
    }

    /// Access the underlying raw sample data.
    pub fn data(&self) -> &[Sample] {
        &self.data
    }

    /// Consumes the chunk and returns the raw vector.
    pub fn into_inner(self) -> Vec<Sample> {
        self.data
    }
}

/// Sample rate of the glasses microphone feed.
pub const MIC_SAMPLE_RATE: u32 = 16_000;

/// One microphone chunk: mono 16-bit PCM at 16 kHz.
pub type MicChunk = SampleChunk<i16, 1, MIC_SAMPLE_RATE>;

/// Audio frame published into the media room.
/// Standardized to 16 kHz mono 16-bit PCM.
#[derive(Archive, Deserialize, Serialize, Debug, Clone)]
#[rkyv(compare(PartialEq))]
pub struct RoomFrame {
    /// Monotonic sequence number assigned by the publish loop
    pub sequence_number: u64,

    /// Publish timestamp in microseconds
    pub timestamp: u64,

    /// Mono 16-bit PCM samples at 16 kHz
    pub samples: MicChunk,
}

impl RoomFrame {
    /// Create a new room frame around a microphone chunk.
    pub fn new(sequence_number: u64, samples: MicChunk) -> Self {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_micros() as u64;

        Self {
            sequence_number,
            timestamp,
            samples,
        }
    }

    /// Get the number of samples per channel
    pub fn samples_per_channel(&self) -> usize {
        self.samples.samples_per_channel()
    }

    /// Serialize the frame using rkyv
    pub fn serialize(&self) -> Result<Vec<u8>> {
        rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .map(|bytes| bytes.to_vec())
            .context("Serialization error")
    }

    /// Deserialize a frame from bytes using rkyv
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        rkyv::from_bytes::<RoomFrame, rkyv::rancor::Error>(bytes).context("Deserialization error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_rejects_partial_frame() {
        let result = SampleChunk::<i16, 2, 48000>::new(vec![1, 2, 3]);
        assert!(result.is_err());
    }

    #[test]
    fn test_chunk_duration() {
        let chunk = MicChunk::new(vec![0i16; 160]).unwrap();
        assert_eq!(chunk.duration(), Duration::from_millis(10));
        assert_eq!(chunk.samples_per_channel(), 160);
        assert_eq!(chunk.sample_rate(), 16_000);
    }

    #[test]
    fn test_room_frame_roundtrip() {
        let chunk = MicChunk::new(vec![100i16, -100, 200, -200]).unwrap();
        let frame = RoomFrame::new(7, chunk);

        let bytes = frame.serialize().unwrap();
        let restored = RoomFrame::deserialize(&bytes).unwrap();

        assert_eq!(restored.sequence_number, 7);
        assert_eq!(restored.samples.data(), frame.samples.data());
    }
}
