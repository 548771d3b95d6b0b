//! Fixed-rate publishing into the media room.
//!
//! The publish loop runs on a steady wall-clock interval, independent of how
//! audio arrives. Each tick it attempts one non-blocking dequeue from the
//! jitter buffer; when a chunk is present it is wrapped in a [`RoomFrame`]
//! and handed to the room publisher. Empty ticks are normal, especially at
//! session start before the buffer fills.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::audio::chunk::{MicChunk, RoomFrame};
use crate::audio::JitterBuffer;

/// The seam to the media-room publisher.
///
/// Concrete implementations forward frames to the vendor room client; tests
/// and the demo use a channel-backed sink.
pub trait FrameSink: Send + Sync {
    fn publish(&self, frame: RoomFrame);
}

impl FrameSink for crossbeam::channel::Sender<RoomFrame> {
    fn publish(&self, frame: RoomFrame) {
        // A dropped receiver means the room side is gone; the loop keeps
        // draining so buffered audio does not pile up.
        let _ = self.send(frame);
    }
}

/// Drains the jitter buffer at a fixed rate and publishes frames.
///
/// With warm-up enabled, publishing is held until the buffer first reports
/// primed, then free-runs for the rest of the session.
pub struct PublishLoop {
    buffer: JitterBuffer<MicChunk>,
    sink: Arc<dyn FrameSink>,
    sequence: AtomicU64,
    warm_up: bool,
    primed: AtomicBool,
}

impl PublishLoop {
    pub fn new(buffer: JitterBuffer<MicChunk>, sink: Arc<dyn FrameSink>, warm_up: bool) -> Self {
        Self {
            buffer,
            sink,
            sequence: AtomicU64::new(0),
            warm_up,
            primed: AtomicBool::new(!warm_up),
        }
    }

    /// One timer tick: dequeue and publish at most one frame.
    ///
    /// Returns whether a frame was published.
    pub fn tick(&self) -> bool {
        if !self.primed.load(Ordering::Acquire) {
            if !self.buffer.is_primed() {
                return false;
            }
            self.primed.store(true, Ordering::Release);
            info!(queued = self.buffer.len(), "Warm-up complete, starting steady publishing");
        }

        match self.buffer.pull() {
            Some(chunk) => {
                let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
                self.sink.publish(RoomFrame::new(seq, chunk));
                true
            }
            None => {
                debug!("Publish tick with empty buffer");
                false
            }
        }
    }

    /// Frames published so far.
    pub fn published_frames(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }

    /// Starts the publish loop background task.
    ///
    /// Ticks every `period` until `shutdown` is set. Returns a `JoinHandle`
    /// that can be used to await task completion.
    pub fn start(
        self: Arc<Self>,
        period: Duration,
        shutdown: Arc<AtomicBool>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(period_ms = period.as_millis() as u64, "Publish loop started");

            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            while !shutdown.load(Ordering::Relaxed) {
                interval.tick().await;
                self.tick();
            }

            info!(published = self.published_frames(), "Publish loop shutting down");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_chunk(seed: i16) -> MicChunk {
        MicChunk::new(vec![seed; 160]).unwrap()
    }

    fn make_loop(warm_up: bool) -> (PublishLoop, crossbeam::channel::Receiver<RoomFrame>) {
        let buffer = JitterBuffer::new(10, 4);
        let (tx, rx) = crossbeam::channel::unbounded();
        (PublishLoop::new(buffer.clone(), Arc::new(tx), warm_up), rx)
    }

    #[test]
    fn test_empty_tick_publishes_nothing() {
        let (publish, rx) = make_loop(false);

        assert!(!publish.tick());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_frames_published_in_order_with_sequence() {
        let (publish, rx) = make_loop(false);

        for seed in 0..3 {
            publish.buffer.push(make_chunk(seed));
        }

        for expected_seq in 0..3 {
            assert!(publish.tick());
            let frame = rx.try_recv().unwrap();
            assert_eq!(frame.sequence_number, expected_seq);
            assert_eq!(frame.samples.data()[0], expected_seq as i16);
        }

        assert!(!publish.tick());
        assert_eq!(publish.published_frames(), 3);
    }

    #[test]
    fn test_warm_up_holds_until_primed() {
        let (publish, rx) = make_loop(true);

        // Below target fill: ticks publish nothing even though data exists.
        for seed in 0..3 {
            publish.buffer.push(make_chunk(seed));
        }
        assert!(!publish.tick());
        assert!(rx.try_recv().is_err());

        // Reaching target fill releases the hold...
        publish.buffer.push(make_chunk(3));
        assert!(publish.tick());

        // ...and publishing free-runs afterwards, even once drained and refilled.
        while publish.tick() {}
        publish.buffer.push(make_chunk(4));
        assert!(publish.tick());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_loop_runs_until_shutdown() {
        let (publish, rx) = make_loop(false);
        for seed in 0..5 {
            publish.buffer.push(make_chunk(seed));
        }

        let publish = Arc::new(publish);
        let shutdown = Arc::new(AtomicBool::new(false));
        let task = publish
            .clone()
            .start(Duration::from_millis(5), shutdown.clone());

        for expected_seq in 0..5 {
            let frame = rx.recv_timeout(Duration::from_secs(2)).unwrap();
            assert_eq!(frame.sequence_number, expected_seq);
        }

        shutdown.store(true, Ordering::Relaxed);
        task.await.unwrap();
        assert_eq!(publish.published_frames(), 5);
    }
}
