// src/audio/mixer.rs  -  Audio session: tone voices + noise layers on one sample clock
//
// The mixer owns the only audio clock.  Transmissions are scheduled against
// it ahead of time and rendered sample by sample from the device callback
// (or offline for WAV export).  At most one noise layer and one interference
// layer exist at any moment; starting a new one replaces the old one.
use super::noise::{interference_gain, noise_gain, random_interference_hz, NoiseSource, Oscillator};
use super::scheduler::{Transmission, RAMP};
use crate::config::NoiseKind;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::Duration;

/// Identifies one started noise or interference layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoiseHandle(u64);

struct Voice {
    start:     u64,
    end:       u64,
    ramp:      u64,
    amplitude: f32,
    osc:       Oscillator,
}

impl Voice {
    /// Linear fade-in from silence, hold, linear fade-out to silence
    fn envelope(&self, t: u64) -> f32 {
        if self.ramp == 0 {
            return 1.0;
        }
        let from_start = t - self.start;
        let to_end     = self.end - t;
        if from_start < self.ramp {
            from_start as f32 / self.ramp as f32
        } else if to_end <= self.ramp {
            to_end as f32 / self.ramp as f32
        } else {
            1.0
        }
    }
}

struct Layer<S> {
    handle:  NoiseHandle,
    source:  S,
    gain:    f32,
    stop_at: Option<u64>,
}

impl<S> Layer<S> {
    fn live(&self, t: u64) -> bool {
        self.stop_at.map_or(true, |stop| t < stop)
    }
}

pub struct Mixer {
    sample_rate:  u32,
    volume:       f32,
    clock:        u64,
    voices:       Vec<Voice>,
    noise:        Option<Layer<NoiseSource>>,
    interference: Option<Layer<Oscillator>>,
    next_handle:  u64,
    rng:          SmallRng,
}

impl Mixer {
    pub fn new(sample_rate: u32, volume: f32) -> Self {
        Self::with_rng(sample_rate, volume, SmallRng::from_entropy())
    }

    pub fn with_rng(sample_rate: u32, volume: f32, rng: SmallRng) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
            volume: volume.clamp(0.0, 1.0),
            clock: 0,
            voices: Vec::new(),
            noise: None,
            interference: None,
            next_handle: 0,
            rng,
        }
    }

    pub fn sample_rate(&self) -> u32 { self.sample_rate }

    /// Current position of the audio clock
    pub fn now(&self) -> Duration {
        let nanos = u128::from(self.clock) * 1_000_000_000 / u128::from(self.sample_rate);
        Duration::from_nanos(nanos as u64)
    }

    fn to_samples(&self, d: Duration) -> u64 {
        (d.as_nanos() * u128::from(self.sample_rate) / 1_000_000_000) as u64
    }

    /// Queue every tone of `tx`, with the transmission starting at clock time `at`
    pub fn play(&mut self, tx: &Transmission, at: Duration) {
        let base = self.to_samples(at);
        let ramp = self.to_samples(RAMP);
        for tone in &tx.tones {
            let start = base + self.to_samples(tone.offset);
            let len   = self.to_samples(tone.duration);
            if len == 0 {
                continue;
            }
            self.voices.push(Voice {
                start,
                end: start + len,
                ramp: ramp.min(len / 2),
                amplitude: tone.amplitude,
                osc: Oscillator::new(tone.hz, self.sample_rate),
            });
        }
    }

    fn handle(&mut self) -> NoiseHandle {
        self.next_handle += 1;
        NoiseHandle(self.next_handle)
    }

    /// Start background noise now, replacing any noise already running
    pub fn start_noise(&mut self, kind: NoiseKind, level: u8) -> NoiseHandle {
        let handle = self.handle();
        if let Some(old) = &self.noise {
            log::debug!("[mixer] noise {:?} replaced by {:?}", old.handle, handle);
        }
        let source = NoiseSource::new(kind, self.sample_rate, &mut self.rng);
        self.noise = Some(Layer { handle, source, gain: noise_gain(level), stop_at: None });
        handle
    }

    /// Start a QRM carrier now, replacing any carrier already running
    pub fn start_interference(&mut self, level: u8) -> NoiseHandle {
        let handle = self.handle();
        let hz = random_interference_hz(&mut self.rng);
        log::debug!("[mixer] interference {:?} at {:.0} Hz", handle, hz);
        self.interference = Some(Layer {
            handle,
            source: Oscillator::new(hz, self.sample_rate),
            gain: interference_gain(level),
            stop_at: None,
        });
        handle
    }

    /// End the layer behind `handle` at clock time `at`.
    /// Handles of layers that were already replaced or stopped are ignored.
    pub fn stop_at(&mut self, handle: NoiseHandle, at: Duration) {
        let at = self.to_samples(at);
        if let Some(l) = self.noise.as_mut().filter(|l| l.handle == handle) {
            l.stop_at = Some(at);
        }
        if let Some(l) = self.interference.as_mut().filter(|l| l.handle == handle) {
            l.stop_at = Some(at);
        }
        self.reap();
    }

    /// Silence everything: noise, interference and queued tones
    pub fn stop_all(&mut self) {
        self.noise = None;
        self.interference = None;
        self.voices.clear();
    }

    /// Number of noise + interference layers still sounding
    #[cfg(test)]
    pub fn active_sources(&self) -> usize {
        let t = self.clock;
        usize::from(self.noise.as_ref().is_some_and(|l| l.live(t)))
            + usize::from(self.interference.as_ref().is_some_and(|l| l.live(t)))
    }

    /// Tones queued or still sounding
    #[cfg(test)]
    pub fn pending_tones(&self) -> usize { self.voices.len() }

    /// Render mono samples and advance the clock
    pub fn render(&mut self, out: &mut [f32]) {
        for slot in out.iter_mut() {
            let t = self.clock;
            let mut s = 0.0;

            for v in self.voices.iter_mut().filter(|v| v.start <= t && t < v.end) {
                s += v.amplitude * v.envelope(t) * v.osc.next_sample();
            }
            if let Some(l) = self.noise.as_mut().filter(|l| l.live(t)) {
                s += l.gain * l.source.next_sample(&mut self.rng);
            }
            if let Some(l) = self.interference.as_mut().filter(|l| l.live(t)) {
                s += l.gain * l.source.next_sample();
            }

            *slot = (s * self.volume).clamp(-1.0, 1.0);
            self.clock += 1;
        }
        self.reap();
    }

    fn reap(&mut self) {
        let t = self.clock;
        self.voices.retain(|v| v.end > t);
        if self.noise.as_ref().is_some_and(|l| !l.live(t)) {
            self.noise = None;
        }
        if self.interference.as_ref().is_some_and(|l| !l.live(t)) {
            self.interference = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::scheduler::ToneEvent;

    const SR: u32 = 8_000;

    fn mixer() -> Mixer {
        Mixer::with_rng(SR, 1.0, SmallRng::seed_from_u64(1))
    }

    fn one_tone(ms: u64) -> Transmission {
        Transmission {
            tones: vec![ToneEvent {
                offset:    Duration::ZERO,
                duration:  Duration::from_millis(ms),
                hz:        500.0,
                amplitude: 1.0,
            }],
            duration: Duration::from_millis(ms * 2),
        }
    }

    fn render_ms(m: &mut Mixer, ms: u64) -> Vec<f32> {
        let mut buf = vec![0.0; (SR as u64 * ms / 1000) as usize];
        m.render(&mut buf);
        buf
    }

    #[test]
    fn silent_when_idle() {
        let mut m = mixer();
        assert!(render_ms(&mut m, 50).iter().all(|s| *s == 0.0));
        assert_eq!(m.now(), Duration::from_millis(50));
    }

    #[test]
    fn second_noise_replaces_first() {
        let mut m = mixer();
        let first = m.start_noise(NoiseKind::White, 50);
        let second = m.start_noise(NoiseKind::Pink, 50);
        assert_ne!(first, second);
        assert_eq!(m.active_sources(), 1);

        // stale handle must not touch the newer source
        m.stop_at(first, Duration::ZERO);
        assert_eq!(m.active_sources(), 1);

        m.stop_at(second, m.now());
        assert_eq!(m.active_sources(), 0);
    }

    #[test]
    fn stopping_is_idempotent() {
        let mut m = mixer();
        m.stop_all();
        m.stop_all();
        let h = m.start_interference(30);
        m.stop_all();
        m.stop_at(h, Duration::ZERO);
        assert_eq!(m.active_sources(), 0);
        assert_eq!(m.pending_tones(), 0);
    }

    #[test]
    fn noise_and_interference_coexist() {
        let mut m = mixer();
        m.start_noise(NoiseKind::Brown, 20);
        m.start_interference(40);
        m.start_interference(40);
        assert_eq!(m.active_sources(), 2);
    }

    #[test]
    fn noise_tail_ends_on_time() {
        let mut m = mixer();
        let h = m.start_noise(NoiseKind::White, 100);
        m.stop_at(h, Duration::from_millis(20));
        let buf = render_ms(&mut m, 40);
        assert!(buf[..160].iter().any(|s| *s != 0.0));
        assert!(buf[160..].iter().all(|s| *s == 0.0));
        assert_eq!(m.active_sources(), 0);
    }

    #[test]
    fn tone_sounds_only_inside_its_window() {
        let mut m = mixer();
        m.play(&one_tone(20), Duration::from_millis(10));
        let buf = render_ms(&mut m, 50);
        // 10 ms lead-in, 20 ms tone, then silence
        assert!(buf[..80].iter().all(|s| *s == 0.0));
        assert!(buf[80..240].iter().any(|s| s.abs() > 0.5));
        assert!(buf[240..].iter().all(|s| *s == 0.0));
        assert_eq!(m.pending_tones(), 0);
    }

    #[test]
    fn envelope_ramps_from_silence() {
        let mut m = mixer();
        m.play(&one_tone(40), Duration::ZERO);
        let buf = render_ms(&mut m, 40);
        let ramp = (SR / 200) as usize; // 5 ms
        let head = buf[..ramp / 2].iter().fold(0.0f32, |a, s| a.max(s.abs()));
        assert!(head < 0.5, "first half of the ramp peaks at {head}");
        assert_eq!(buf[0], 0.0);
    }

    #[test]
    fn stop_all_drops_queued_tones() {
        let mut m = mixer();
        m.play(&one_tone(20), Duration::from_millis(100));
        assert_eq!(m.pending_tones(), 1);
        m.stop_all();
        assert!(render_ms(&mut m, 150).iter().all(|s| *s == 0.0));
    }
}
