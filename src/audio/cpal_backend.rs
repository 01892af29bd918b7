// src/audio/cpal_backend.rs  -  cpal output stream driven by the shared Mixer
use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream};
use crate::config::NoiseKind;
use super::{AudioOutput, Mixer, NoiseHandle, Transmission};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub struct CpalAudio {
    mixer:   Arc<Mutex<Mixer>>,
    _stream: Stream,
}

// Stream is !Send on some platforms; wrap it
unsafe impl Send for CpalAudio {}

impl CpalAudio {
    pub fn new(volume: f32) -> Result<Self> {
        let host   = cpal::default_host();
        let device = host.default_output_device()
            .ok_or_else(|| anyhow!("No output device"))?;
        let config = device.default_output_config()?;
        let sr = config.sample_rate().0;
        log::info!("[audio] {} @ {} Hz, {:?}",
            device.name().unwrap_or_default(), sr, config.sample_format());

        let mixer = Arc::new(Mutex::new(Mixer::new(sr, volume)));

        let m = Arc::clone(&mixer);
        let stream = match config.sample_format() {
            SampleFormat::F32 => build_stream::<f32>(&device, &config.into(), m)?,
            SampleFormat::I16 => build_stream::<i16>(&device, &config.into(), m)?,
            SampleFormat::U16 => build_stream::<u16>(&device, &config.into(), m)?,
            _                 => return Err(anyhow!("Unsupported sample format")),
        };
        stream.play()?;
        Ok(Self { mixer, _stream: stream })
    }

    fn mixer(&self) -> MutexGuard<'_, Mixer> {
        self.mixer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn build_stream<S>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mixer:  Arc<Mutex<Mixer>>,
) -> Result<Stream>
where S: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>
{
    let ch = config.channels as usize;
    let mut mono: Vec<f32> = Vec::new();
    let stream = device.build_output_stream(
        config,
        move |data: &mut [S], _: &cpal::OutputCallbackInfo| {
            let frames = data.len() / ch;
            mono.resize(frames, 0.0);
            mixer.lock().unwrap_or_else(PoisonError::into_inner).render(&mut mono);
            for (frame, &v) in data.chunks_mut(ch).zip(&mono) {
                let out = S::from_sample(v);
                for smp in frame.iter_mut() { *smp = out; }
            }
        },
        |e| log::error!("Audio error: {e}"),
        None,
    )?;
    Ok(stream)
}

impl AudioOutput for CpalAudio {
    fn now(&self) -> Duration {
        self.mixer().now()
    }
    fn play(&mut self, tx: &Transmission, at: Duration) {
        self.mixer().play(tx, at);
    }
    fn start_noise(&mut self, kind: NoiseKind, level: u8) -> Option<NoiseHandle> {
        Some(self.mixer().start_noise(kind, level))
    }
    fn start_interference(&mut self, level: u8) -> Option<NoiseHandle> {
        Some(self.mixer().start_interference(level))
    }
    fn stop_at(&mut self, handle: NoiseHandle, at: Duration) {
        self.mixer().stop_at(handle, at);
    }
    fn stop_all(&mut self) {
        self.mixer().stop_all();
    }
}
