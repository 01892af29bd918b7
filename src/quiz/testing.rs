// src/quiz/testing.rs  -  Recording stand-ins for audio, speech and wake lock
use super::capabilities::{Capabilities, Speech, WakeLock};
use crate::audio::{AudioOutput, Mixer, NoiseHandle, Transmission};
use crate::config::NoiseKind;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Everything the capabilities were asked to do.
/// Audio calls are forwarded to a real (never rendered) mixer so layer
/// bookkeeping can be inspected.
pub struct RecordLog {
    pub mixer:                Mixer,
    pub plays:                Vec<Transmission>,
    pub play_times:           Vec<Duration>,
    pub noise_started:        usize,
    pub interference_started: usize,
    pub stop_all_calls:       usize,
    pub speech_available:     bool,
    pub speaking:             bool,
    pub spoken:               Vec<String>,
    pub wake_lock_held:       bool,
    pub wake_lock_acquires:   usize,
}

impl Default for RecordLog {
    fn default() -> Self {
        Self {
            mixer:                Mixer::with_rng(8_000, 1.0, SmallRng::seed_from_u64(3)),
            plays:                Vec::new(),
            play_times:           Vec::new(),
            noise_started:        0,
            interference_started: 0,
            stop_all_calls:       0,
            speech_available:     false,
            speaking:             false,
            spoken:               Vec::new(),
            wake_lock_held:       false,
            wake_lock_acquires:   0,
        }
    }
}

#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<RecordLog>>);

impl Recorder {
    pub fn with_speech() -> Self {
        let p = Self::default();
        p.log().speech_available = true;
        p
    }

    pub fn log(&self) -> MutexGuard<'_, RecordLog> {
        self.0.lock().unwrap()
    }

    pub fn finish_speaking(&self) {
        self.log().speaking = false;
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            audio:     Box::new(RecorderAudio(self.clone())),
            speech:    Box::new(RecorderSpeech(self.clone())),
            wake_lock: Box::new(RecorderWakeLock(self.clone())),
        }
    }
}

struct RecorderAudio(Recorder);

impl AudioOutput for RecorderAudio {
    fn now(&self) -> Duration { self.0.log().mixer.now() }

    fn play(&mut self, tx: &Transmission, at: Duration) {
        let mut log = self.0.log();
        log.mixer.play(tx, at);
        log.plays.push(tx.clone());
        log.play_times.push(at);
    }

    fn start_noise(&mut self, kind: NoiseKind, level: u8) -> Option<NoiseHandle> {
        let mut log = self.0.log();
        log.noise_started += 1;
        Some(log.mixer.start_noise(kind, level))
    }

    fn start_interference(&mut self, level: u8) -> Option<NoiseHandle> {
        let mut log = self.0.log();
        log.interference_started += 1;
        Some(log.mixer.start_interference(level))
    }

    fn stop_at(&mut self, handle: NoiseHandle, at: Duration) {
        self.0.log().mixer.stop_at(handle, at);
    }

    fn stop_all(&mut self) {
        let mut log = self.0.log();
        log.stop_all_calls += 1;
        log.mixer.stop_all();
    }
}

struct RecorderSpeech(Recorder);

impl Speech for RecorderSpeech {
    fn speak(&mut self, text: &str, _voice: &str) -> bool {
        let mut log = self.0.log();
        if !log.speech_available {
            return false;
        }
        log.spoken.push(text.to_string());
        log.speaking = true;
        true
    }

    fn is_speaking(&mut self) -> bool { self.0.log().speaking }

    fn cancel(&mut self) { self.0.log().speaking = false; }
}

struct RecorderWakeLock(Recorder);

impl WakeLock for RecorderWakeLock {
    fn acquire(&mut self) {
        let mut log = self.0.log();
        log.wake_lock_held = true;
        log.wake_lock_acquires += 1;
    }

    fn release(&mut self) { self.0.log().wake_lock_held = false; }
}
