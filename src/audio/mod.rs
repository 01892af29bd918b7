// src/audio/mod.rs  -  AudioOutput trait, mixer, backends
pub mod mixer;
pub mod noise;
pub mod scheduler;
pub mod wav;

use crate::config::NoiseKind;
use std::time::{Duration, Instant};

pub use mixer::{Mixer, NoiseHandle};
pub use scheduler::{schedule, Transmission};

/// Noise keeps running this long after the last tone so the final
/// character is not cut off
pub const NOISE_TAIL: Duration = Duration::from_secs(1);

/// Platform-agnostic audio output interface.
///
/// Nothing here may fail: a backend that cannot produce sound simply drops
/// the request, and the quiz keeps running on its own timers.
pub trait AudioOutput: Send {
    /// Audio clock; transmissions are scheduled against this
    fn now(&self) -> Duration;
    /// Queue a transmission to start at clock time `at`
    fn play(&mut self, tx: &Transmission, at: Duration);
    /// Start background noise, replacing any running noise
    fn start_noise(&mut self, kind: NoiseKind, level: u8) -> Option<NoiseHandle>;
    /// Start a QRM carrier, replacing any running carrier
    fn start_interference(&mut self, level: u8) -> Option<NoiseHandle>;
    /// Let a noise layer run until clock time `at`
    fn stop_at(&mut self, handle: NoiseHandle, at: Duration);
    /// Tear down the whole session
    fn stop_all(&mut self);
}

// ── cpal backend ─────────────────────────────────────────────────────────────
#[cfg(feature = "audio-cpal")]
mod cpal_backend;
#[cfg(feature = "audio-cpal")]
pub use cpal_backend::CpalAudio;

/// Null backend (no sound: no device, no-audio builds, tests)
pub struct NullAudio {
    epoch: Instant,
}

impl NullAudio {
    pub fn new() -> Self { Self { epoch: Instant::now() } }
}

impl AudioOutput for NullAudio {
    fn now(&self) -> Duration { self.epoch.elapsed() }
    fn play(&mut self, _tx: &Transmission, _at: Duration) {}
    fn start_noise(&mut self, _kind: NoiseKind, _level: u8) -> Option<NoiseHandle> { None }
    fn start_interference(&mut self, _level: u8) -> Option<NoiseHandle> { None }
    fn stop_at(&mut self, _handle: NoiseHandle, _at: Duration) {}
    fn stop_all(&mut self) {}
}

/// Factory: returns the best available backend
pub fn create_audio(volume: f32) -> Box<dyn AudioOutput> {
    #[cfg(feature = "audio-cpal")]
    {
        match CpalAudio::new(volume) {
            Ok(a)  => return Box::new(a),
            Err(e) => log::warn!("cpal init failed: {e}  →  using NullAudio"),
        }
    }
    #[cfg(not(feature = "audio-cpal"))]
    let _ = volume;
    Box::new(NullAudio::new())
}
