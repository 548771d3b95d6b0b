//! Per-session context tying ingest, buffering, and egress together.
//!
//! One [`Session`] exists per active device connection. It owns the jitter
//! buffer, the ingest front-end, and the publish loop, replacing any shared
//! global room handle: event handlers get the context, not a static.

pub mod egress;
pub mod ingest;

pub use egress::{FrameSink, PublishLoop};
pub use ingest::AudioIngest;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::JoinHandle;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::audio::chunk::MicChunk;
use crate::audio::JitterBuffer;
use crate::config::SessionConfig;

/// Audio bridge state for one device session.
///
/// Created on session start; [`stop`](Session::stop) tears everything down
/// and releases all buffered audio. Stopping twice is harmless.
pub struct Session {
    id: Uuid,
    config: SessionConfig,
    buffer: JitterBuffer<MicChunk>,
    ingest: AudioIngest,
    publish: Arc<PublishLoop>,
    shutdown: Arc<AtomicBool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    /// Create the session and start its publish loop.
    ///
    /// Must be called within a tokio runtime.
    pub fn start(config: SessionConfig, sink: Arc<dyn FrameSink>) -> Self {
        let id = Uuid::new_v4();
        let buffer = JitterBuffer::new(config.max_capacity, config.target_fill);
        let ingest = AudioIngest::new(config.chunk_samples, buffer.clone());
        let publish = Arc::new(PublishLoop::new(buffer.clone(), sink, config.warm_up));
        let shutdown = Arc::new(AtomicBool::new(false));

        let task = publish
            .clone()
            .start(config.publish_interval(), shutdown.clone());

        info!(session = %id, config = ?config, "Session started");

        Self {
            id,
            config,
            buffer,
            ingest,
            publish,
            shutdown,
            task: Mutex::new(Some(task)),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The ingest front-end, to be wired into the device audio callback.
    pub fn ingest(&self) -> &AudioIngest {
        &self.ingest
    }

    /// Chunks currently queued between ingest and egress.
    pub fn buffered_chunks(&self) -> usize {
        self.buffer.len()
    }

    /// Frames published into the room so far.
    pub fn published_frames(&self) -> u64 {
        self.publish.published_frames()
    }

    /// Stop the publish loop and discard all buffered audio.
    pub async fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);

        if let Some(task) = self.task.lock().await.take() {
            if let Err(e) = task.await {
                warn!(session = %self.id, "Publish task ended abnormally: {e}");
            }
        }

        self.ingest.reset();
        self.buffer.clear();
        info!(
            session = %self.id,
            published = self.publish.published_frames(),
            "Session stopped"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_session_bridges_payloads_to_frames() {
        let (tx, rx) = crossbeam::channel::unbounded();
        let config = SessionConfig {
            chunk_samples: 4,
            max_capacity: 10,
            target_fill: 2,
            warm_up: false,
        };
        let session = Session::start(config, Arc::new(tx));

        let payload: Vec<u8> = (0i16..8).flat_map(|s| s.to_le_bytes()).collect();
        session.ingest().accept_payload(&payload);

        for expected_seq in 0..2 {
            let frame = rx.recv_timeout(Duration::from_secs(2)).unwrap();
            assert_eq!(frame.sequence_number, expected_seq);
        }

        session.stop().await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_stop_clears_buffered_audio_and_is_idempotent() {
        let (tx, _rx) = crossbeam::channel::unbounded();
        let config = SessionConfig {
            chunk_samples: 4,
            // Warm-up never satisfied, so ingested chunks stay buffered.
            target_fill: 100,
            max_capacity: 100,
            warm_up: true,
        };
        let session = Session::start(config, Arc::new(tx));

        session
            .ingest()
            .accept_samples(&[0i16; 40]);
        assert_eq!(session.buffered_chunks(), 10);

        session.stop().await;
        assert_eq!(session.buffered_chunks(), 0);
        assert_eq!(session.published_frames(), 0);

        session.stop().await;
    }
}
