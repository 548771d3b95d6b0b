//! Demo: bridge a synthetic glasses microphone into a media room sink.
//!
//! Stands in for the vendor wiring: a sine-tone generator plays the device
//! session (push-driven, jittery payload sizes and timing), a channel-backed
//! [`FrameSink`] plays the room client and logs what it receives. Between
//! them sits the real session: chunk assembly, jitter buffer, fixed-rate
//! publish loop.

mod audio;
mod config;
mod pipeline;
mod session;

use std::f32::consts::PI;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use rand::Rng;
use tracing::info;

use audio::{AudioSample, MIC_SAMPLE_RATE, RoomFrame};
use config::SessionConfig;
use session::Session;

/// Generates a continuous sine tone as raw PCM16 payloads.
///
/// Phase carries across payloads so the signal is seamless regardless of
/// how irregularly it is delivered.
struct ToneGenerator {
    frequency: f32,
    amplitude: f32,
    phase: f32,
}

impl ToneGenerator {
    fn new(frequency: f32, amplitude: f32) -> Self {
        Self {
            frequency,
            amplitude,
            phase: 0.0,
        }
    }

    /// Produce the next `samples` samples as a little-endian byte payload.
    fn next_payload(&mut self, samples: usize) -> Vec<u8> {
        let phase_inc = 2.0 * PI * self.frequency / MIC_SAMPLE_RATE as f32;
        let mut payload = Vec::with_capacity(samples * 2);

        for _ in 0..samples {
            let val = i16::from_f64_normalized((self.phase.sin() * self.amplitude) as f64);
            payload.extend_from_slice(&val.to_le_bytes());
            self.phase = (self.phase + phase_inc) % (2.0 * PI);
        }

        payload
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    info!("Starting glassbridge demo...");

    let (frame_tx, frame_rx) = crossbeam::channel::unbounded::<RoomFrame>();

    // Stand-in room client: logs every frame the publish loop emits.
    let room = std::thread::spawn(move || {
        let mut received = 0u64;
        while let Ok(frame) = frame_rx.recv() {
            received += 1;
            if frame.sequence_number % 50 == 0 {
                info!(
                    seq = frame.sequence_number,
                    samples = frame.samples_per_channel(),
                    "Room received frame"
                );
            }
        }
        info!(received, "Room side disconnected");
    });

    let config = SessionConfig::default();
    let session = Session::start(config, Arc::new(frame_tx));

    // Synthetic glasses microphone: ~2 seconds of tone, delivered in
    // irregular payload sizes at irregular intervals.
    let mut tone = ToneGenerator::new(440.0, 0.5);
    let mut rng = rand::thread_rng();
    let mut remaining = 2 * MIC_SAMPLE_RATE as usize;

    while remaining > 0 {
        let samples = rng.gen_range(60..=400).min(remaining);
        session.ingest().accept_payload(&tone.next_payload(samples));
        remaining -= samples;

        tokio::time::sleep(Duration::from_millis(rng.gen_range(5..=20))).await;
    }

    info!(
        buffered = session.buffered_chunks(),
        published = session.published_frames(),
        "Ingest finished, stopping session"
    );
    session.stop().await;

    drop(session);
    room.join().ok();

    Ok(())
}
