pub mod chunker;
pub mod jitter;

pub use chunker::ChunkAssembler;
pub use jitter::JitterBuffer;
