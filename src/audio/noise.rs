// src/audio/noise.rs  -  Background noise and interference sources
use crate::config::NoiseKind;
use rand::Rng;
use std::f32::consts::TAU;

/// Highest usable QRM level; the slider range stops here
pub const QRM_MAX_LEVEL: u8 = 73;

/// Chance that a QRN sample is silent
const QRN_SILENCE: f32 = 0.995;

/// Noise level 0–100 → linear gain 0.0–1.0
pub fn noise_gain(level: u8) -> f32 {
    f32::from(level.min(100)) / 100.0
}

/// QRM level 0–73 → linear gain 0.0–0.73
pub fn interference_gain(level: u8) -> f32 {
    f32::from(level.min(QRM_MAX_LEVEL)) / 100.0
}

/// A competing signal sits somewhere in 650–750 Hz
pub fn random_interference_hz<R: Rng>(rng: &mut R) -> f32 {
    rng.gen_range(650.0..750.0)
}

/// Free-running sine oscillator
#[derive(Debug, Clone)]
pub struct Oscillator {
    phase: f32,
    step:  f32,
}

impl Oscillator {
    pub fn new(hz: f32, sample_rate: u32) -> Self {
        Self { phase: 0.0, step: hz / sample_rate as f32 }
    }

    pub fn next_sample(&mut self) -> f32 {
        let v = (self.phase * TAU).sin();
        self.phase = (self.phase + self.step) % 1.0;
        v
    }
}

/// Per-sample generator state for one noise kind
#[derive(Debug, Clone)]
pub enum NoiseSource {
    White,
    /// Paul Kellet's refined pink filter, seven one-pole stages
    Pink([f32; 7]),
    /// Leaky random walk
    Brown(f32),
    /// QRN: mostly silence with rare static crashes
    Impulse,
    /// QRM selected as the noise type: a steady carrier
    Tone(Oscillator),
}

impl NoiseSource {
    pub fn new<R: Rng>(kind: NoiseKind, sample_rate: u32, rng: &mut R) -> Self {
        match kind {
            NoiseKind::White => Self::White,
            NoiseKind::Pink  => Self::Pink([0.0; 7]),
            NoiseKind::Brown => Self::Brown(0.0),
            NoiseKind::Qrn   => Self::Impulse,
            NoiseKind::Qrm   => Self::Tone(Oscillator::new(random_interference_hz(rng), sample_rate)),
        }
    }

    pub fn next_sample<R: Rng>(&mut self, rng: &mut R) -> f32 {
        match self {
            Self::White => white(rng),
            Self::Pink(b) => {
                let w = white(rng);
                b[0] = 0.99886 * b[0] + w * 0.0555179;
                b[1] = 0.99332 * b[1] + w * 0.0750759;
                b[2] = 0.96900 * b[2] + w * 0.1538520;
                b[3] = 0.86650 * b[3] + w * 0.3104856;
                b[4] = 0.55000 * b[4] + w * 0.5329522;
                b[5] = -0.7616 * b[5] - w * 0.0168980;
                let out = (b[0] + b[1] + b[2] + b[3] + b[4] + b[5] + b[6] + w * 0.5362) * 0.11;
                b[6] = w * 0.115926;
                out
            }
            Self::Brown(last) => {
                *last = (*last + 0.02 * white(rng)) / 1.02;
                *last * 3.5
            }
            Self::Impulse => {
                if rng.gen::<f32>() < QRN_SILENCE { 0.0 } else { white(rng) * 0.8 }
            }
            Self::Tone(osc) => osc.next_sample(),
        }
    }
}

fn white<R: Rng>(rng: &mut R) -> f32 {
    rng.gen_range(-1.0..=1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn collect(kind: NoiseKind, n: usize) -> Vec<f32> {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut src = NoiseSource::new(kind, 48_000, &mut rng);
        (0..n).map(|_| src.next_sample(&mut rng)).collect()
    }

    #[test]
    fn gain_mapping() {
        assert_relative_eq!(noise_gain(0), 0.0);
        assert_relative_eq!(noise_gain(24), 0.24);
        assert_relative_eq!(noise_gain(250), 1.0);
        assert_relative_eq!(interference_gain(73), 0.73);
        assert_relative_eq!(interference_gain(100), 0.73);
    }

    #[test]
    fn white_stays_in_range() {
        let s = collect(NoiseKind::White, 10_000);
        assert!(s.iter().all(|v| (-1.0..=1.0).contains(v)));
        let mean = s.iter().sum::<f32>() / s.len() as f32;
        assert!(mean.abs() < 0.05, "mean {mean}");
    }

    #[test]
    fn pink_and_brown_are_bounded() {
        for kind in [NoiseKind::Pink, NoiseKind::Brown] {
            let s = collect(kind, 48_000);
            assert!(s.iter().all(|v| v.abs() < 1.5), "{kind:?}");
            assert!(s.iter().any(|v| *v != 0.0), "{kind:?}");
        }
    }

    #[test]
    fn qrn_is_mostly_silence() {
        let s = collect(NoiseKind::Qrn, 100_000);
        let spikes = s.iter().filter(|v| **v != 0.0).count();
        // 0.5 % expected → ~500 spikes
        assert!((200..1000).contains(&spikes), "spikes {spikes}");
        assert!(s.iter().all(|v| v.abs() <= 0.8));
    }

    #[test]
    fn qrm_is_a_tone_in_band() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..100 {
            let hz = random_interference_hz(&mut rng);
            assert!((650.0..750.0).contains(&hz));
        }
        let s = collect(NoiseKind::Qrm, 4_800);
        let peak = s.iter().fold(0.0f32, |m, v| m.max(v.abs()));
        assert!(peak > 0.99 && peak <= 1.0);
    }
}
