//! Device-side audio ingestion.
//!
//! The session host hands us raw little-endian PCM16 payloads from its audio
//! callback. Each payload is decoded, reassembled into fixed-size chunks, and
//! queued on the jitter buffer. Nothing here blocks or reports errors back
//! into the vendor callback.

use tracing::debug;

use crate::audio::chunk::{MIC_SAMPLE_RATE, MicChunk};
use crate::audio::{ChunkAssembler, JitterBuffer};

/// Decode a raw little-endian PCM16 payload into samples.
///
/// An odd trailing byte is dropped; the session host only delivers whole
/// samples, so a truncated tail means the transport clipped the payload.
pub fn decode_pcm16(payload: &[u8]) -> Vec<i16> {
    if payload.len() % 2 != 0 {
        debug!(len = payload.len(), "PCM payload has a truncated trailing sample");
    }

    payload
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Callback-facing front-end of the ingest path.
///
/// Owns the chunk assembler and a handle to the session's jitter buffer.
pub struct AudioIngest {
    assembler: ChunkAssembler<i16, 1, MIC_SAMPLE_RATE>,
    buffer: JitterBuffer<MicChunk>,
}

impl AudioIngest {
    pub fn new(chunk_samples: usize, buffer: JitterBuffer<MicChunk>) -> Self {
        Self {
            assembler: ChunkAssembler::new(chunk_samples),
            buffer,
        }
    }

    /// Accept one raw payload from the device session callback.
    pub fn accept_payload(&self, payload: &[u8]) {
        self.accept_samples(&decode_pcm16(payload));
    }

    /// Accept already-decoded samples.
    pub fn accept_samples(&self, samples: &[i16]) {
        for chunk in self.assembler.append(samples) {
            self.buffer.push(chunk);
        }
    }

    /// Drop any partially assembled chunk, e.g. when the device stream
    /// restarts mid-chunk.
    pub fn reset(&self) {
        self.assembler.reset();
    }
}
