//! Configuration for a bridged audio session.

use std::time::Duration;

use crate::audio::MIC_SAMPLE_RATE;

/// Tuning for one device session's audio path.
///
/// Defaults: 10 ms chunks at the microphone rate, at most 10 chunks queued
/// (100 ms worst-case buffered latency), playback considered primed at 4.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Samples per chunk handed to the jitter buffer.
    pub chunk_samples: usize,
    /// Maximum chunks the jitter buffer retains before dropping the oldest.
    pub max_capacity: usize,
    /// Advisory queue depth at which steady playback may begin.
    pub target_fill: usize,
    /// Hold publishing until the buffer first reaches `target_fill`.
    pub warm_up: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            chunk_samples: 160,
            max_capacity: 10,
            target_fill: 4,
            warm_up: true,
        }
    }
}

impl SessionConfig {
    /// Wall-clock duration of audio in one chunk.
    pub fn chunk_duration(&self) -> Duration {
        Duration::from_secs_f64(self.chunk_samples as f64 / MIC_SAMPLE_RATE as f64)
    }

    /// Publish loop period. One chunk is drained per tick, so the period
    /// matches the chunk duration to keep the output rate nominal.
    pub fn publish_interval(&self) -> Duration {
        self.chunk_duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_interval_matches_chunk_duration() {
        let config = SessionConfig::default();
        assert_eq!(config.publish_interval(), Duration::from_millis(10));
    }
}
