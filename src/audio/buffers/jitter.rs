//! A bounded FIFO jitter buffer for audio chunks.
//!
//! Smooths arrival-time variance between the push-driven device callback and
//! the fixed-rate publish loop. The queue is strictly bounded: pushing into a
//! full buffer silently discards the oldest chunk, trading completeness for
//! bounded latency. Pulling from an empty buffer returns `None`. Both are
//! normal conditions, never errors.
//!
//! A `target_fill` threshold reports when enough lead buffering exists to
//! begin steady playback. It is advisory only and gates nothing here; the
//! publish loop consumes it for its warm-up policy.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::pipeline::{Sink, Source};

struct Inner<T> {
    queue: VecDeque<T>,
    dropped: u64,
}

/// A chunk-based FIFO buffer with a hard capacity and drop-oldest overflow.
///
/// Chunks come out in exactly the order they went in. The buffer never
/// inspects chunk contents.
///
/// # Thread Safety
///
/// The handle is cheaply cloneable; all clones share one queue behind a
/// single mutex, so the ingest callback and the publish timer can mutate it
/// from different threads without breaking the FIFO or capacity invariants.
#[derive(Clone)]
pub struct JitterBuffer<T> {
    inner: Arc<Mutex<Inner<T>>>,
    max_capacity: usize,
    target_fill: usize,
}

impl<T> JitterBuffer<T> {
    /// Create a buffer holding at most `max_capacity` chunks, reporting
    /// ready once `target_fill` chunks are queued.
    pub fn new(max_capacity: usize, target_fill: usize) -> Self {
        assert!(max_capacity > 0, "jitter buffer capacity must be non-zero");

        Self {
            inner: Arc::new(Mutex::new(Inner {
                queue: VecDeque::with_capacity(max_capacity),
                dropped: 0,
            })),
            max_capacity,
            target_fill,
        }
    }

    /// Enqueue a chunk at the tail, discarding the oldest chunk first if the
    /// buffer is full.
    pub fn push(&self, chunk: T) {
        let mut inner = self.inner.lock().unwrap();

        if inner.queue.len() == self.max_capacity {
            inner.queue.pop_front();
            inner.dropped += 1;
            debug!(dropped = inner.dropped, "Jitter buffer full, dropped oldest chunk");
        }

        inner.queue.push_back(chunk);
    }

    /// Dequeue the oldest chunk, or `None` if the buffer is empty.
    ///
    /// Never blocks. Callers on a fixed-interval timer treat `None` as a
    /// normal empty tick.
    pub fn pull(&self) -> Option<T> {
        self.inner.lock().unwrap().queue.pop_front()
    }

    /// Whether enough chunks are queued to begin steady playback.
    pub fn is_primed(&self) -> bool {
        self.inner.lock().unwrap().queue.len() >= self.target_fill
    }

    /// Current number of queued chunks.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total chunks discarded by the drop-oldest policy since creation.
    pub fn dropped_chunks(&self) -> u64 {
        self.inner.lock().unwrap().dropped
    }

    /// Discard all queued chunks immediately.
    pub fn clear(&self) {
        self.inner.lock().unwrap().queue.clear();
    }
}

impl<T: Send> Sink for JitterBuffer<T> {
    type Input = T;

    fn push(&self, input: T) {
        JitterBuffer::push(self, input);
    }
}

impl<T: Send> Source for JitterBuffer<T> {
    type Output = T;

    fn pull(&self) -> Option<T> {
        JitterBuffer::pull(self)
    }
}
