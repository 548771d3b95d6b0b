//! Audio data types and buffering components.
//!
//! # Data Types
//! - [`AudioSample`] - Trait for audio sample types (i16, f32)
//! - [`chunk::SampleChunk`] - A fixed-length chunk of raw PCM samples
//! - [`chunk::MicChunk`] - The glasses microphone chunk (mono i16 at 16 kHz)
//! - [`chunk::RoomFrame`] - A [`chunk::MicChunk`] with sequence number for room publishing
//!
//! # Buffers
//! - [`buffers::JitterBuffer`] - Bounded drop-oldest FIFO smoothing arrival jitter
//! - [`buffers::ChunkAssembler`] - Reassembles deliveries into fixed-size chunks

pub mod buffers;
pub mod chunk;
pub mod sample;

pub use buffers::{ChunkAssembler, JitterBuffer};
pub use chunk::{MIC_SAMPLE_RATE, MicChunk, RoomFrame, SampleChunk};
pub use sample::AudioSample;
