// src/audio/wav.rs  -  Offline rendering of one transmission to a WAV file
use super::{Mixer, Transmission, NOISE_TAIL};
use crate::config::NoiseKind;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

pub const WAV_SAMPLE_RATE: u32 = 44_100;

/// Background for an offline take
#[derive(Debug, Clone, Copy)]
pub struct Backdrop {
    pub noise_kind:  NoiseKind,
    pub noise_level: u8,
    pub qrm_level:   u8,
    /// Noise-only time before the first tone
    pub lead_in:     Duration,
}

/// Render `tx` the way a live repeat sounds: noise lead-in, the tones, then
/// the noise tail.
pub fn render(mixer: &mut Mixer, tx: &Transmission, backdrop: &Backdrop) -> Vec<f32> {
    let start = mixer.now();
    let mut layers = Vec::new();
    if backdrop.noise_level > 0 {
        layers.push(mixer.start_noise(backdrop.noise_kind, backdrop.noise_level));
    }
    if backdrop.qrm_level > 0 {
        layers.push(mixer.start_interference(backdrop.qrm_level));
    }
    mixer.play(tx, start + backdrop.lead_in);

    let end = start + backdrop.lead_in + tx.duration;
    for h in layers {
        mixer.stop_at(h, end + NOISE_TAIL);
    }

    let total = backdrop.lead_in + tx.duration + NOISE_TAIL;
    let frames = (total.as_secs_f64() * f64::from(mixer.sample_rate())).round() as usize;
    let mut out = vec![0.0; frames];
    mixer.render(&mut out);
    out
}

/// Write mono samples as 16-bit PCM
pub fn write(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels:        1,
        sample_rate,
        bits_per_sample: 16,
        sample_format:   hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Creating WAV file {:?}", path))?;
    for &s in samples {
        let v = (s.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
        writer.write_sample(v)
            .with_context(|| format!("Writing WAV file {:?}", path))?;
    }
    writer.finalize()
        .with_context(|| format!("Finalizing WAV file {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::schedule;
    use crate::morse::{encode, Timing};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn take_covers_lead_in_tones_and_tail() {
        let mut rng = SmallRng::seed_from_u64(5);
        let tx = schedule(&encode("DL1ZBC"), &Timing::from_wpm(25), 650.0, 0, &mut rng);
        let mut mixer = Mixer::with_rng(8_000, 0.8, SmallRng::seed_from_u64(6));
        let backdrop = Backdrop {
            noise_kind:  NoiseKind::Pink,
            noise_level: 20,
            qrm_level:   0,
            lead_in:     Duration::from_millis(500),
        };
        let samples = render(&mut mixer, &tx, &backdrop);
        let expected = (backdrop.lead_in + tx.duration + NOISE_TAIL).as_secs_f64() * 8_000.0;
        assert_eq!(samples.len(), expected.round() as usize);
        assert_eq!(mixer.active_sources(), 0);
        assert_eq!(mixer.pending_tones(), 0);
    }

    #[test]
    fn written_file_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take.wav");
        let samples: Vec<f32> = (0..800).map(|i| (i as f32 / 800.0) - 0.5).collect();
        write(&path, &samples, 8_000).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 8_000);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len(), 800);
    }
}
