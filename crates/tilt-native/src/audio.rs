// ---------------- Native beeps (cpal) ----------------

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex, PoisonError};
use tilt_core::{AudioError, BeepRequest, BeepSink};

const BEEP_AMPLITUDE: f32 = 0.3;
const ENVELOPE_SEC: f32 = 0.005;

#[derive(Clone)]
struct ActiveTone {
    phase: f32,     // radians
    phase_inc: f32, // radians per sample
    total_samples: u32,
    samples_emitted: u32,
    ramp_samples: u32,
}

struct AudioState {
    sample_rate: f32,
    tones: Vec<ActiveTone>,
}

/// Sine beeper on the default output device. Keeps its stream alive for as
/// long as it exists.
pub struct CpalBeeper {
    state: Arc<Mutex<AudioState>>,
    stream: Option<cpal::Stream>,
}

impl CpalBeeper {
    pub fn new() -> Self {
        let state = Arc::new(Mutex::new(AudioState {
            sample_rate: 44_100.0,
            tones: Vec::new(),
        }));
        let stream = match start_stream(Arc::clone(&state)) {
            Ok(s) => Some(s),
            Err(e) => {
                log::warn!("Audio disabled: {e}");
                None
            }
        };
        Self {
            state,
            stream,
        }
    }
}

impl BeepSink for CpalBeeper {
    fn beep(&self, req: BeepRequest) -> Result<(), AudioError> {
        if self.stream.is_none() {
            return Err(AudioError::NoDevice);
        }
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let sr = guard.sample_rate;
        let total = ((req.duration_sec * sr) as u32).max(1);
        guard.tones.push(ActiveTone {
            phase: 0.0,
            phase_inc: 2.0 * std::f32::consts::PI * req.frequency_hz / sr,
            total_samples: total,
            samples_emitted: 0,
            ramp_samples: ((ENVELOPE_SEC * sr) as u32).min(total / 2),
        });
        Ok(())
    }
}

fn start_stream(state: Arc<Mutex<AudioState>>) -> Result<cpal::Stream, AudioError> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
    let config = device
        .default_output_config()
        .map_err(|e| AudioError::Backend(e.to_string()))?;
    let channels = config.channels() as usize;
    state
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .sample_rate = config.sample_rate().0 as f32;

    let err_fn = |err| log::error!("audio stream error: {err}");
    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => {
            build_stream::<f32>(&device, &config.into(), channels, state, err_fn, |s| s)
        }
        cpal::SampleFormat::I16 => {
            build_stream::<i16>(&device, &config.into(), channels, state, err_fn, |s| {
                (s * i16::MAX as f32) as i16
            })
        }
        cpal::SampleFormat::U16 => {
            build_stream::<u16>(&device, &config.into(), channels, state, err_fn, |s| {
                ((s * 0.5 + 0.5).clamp(0.0, 1.0) * u16::MAX as f32) as u16
            })
        }
        other => return Err(AudioError::Backend(format!("unsupported sample format {other:?}"))),
    }
    .map_err(|e| AudioError::Backend(e.to_string()))?;

    stream
        .play()
        .map_err(|e| AudioError::Backend(e.to_string()))?;
    Ok(stream)
}

fn mix_sample(tones: &mut Vec<ActiveTone>) -> f32 {
    let mut out = 0.0f32;
    let mut i = 0usize;
    while i < tones.len() {
        let tone = &mut tones[i];
        // linear attack/release to avoid clicks
        let n = tone.samples_emitted;
        let remaining = tone.total_samples - n;
        let ramp = tone.ramp_samples.max(1) as f32;
        let env = (n as f32 / ramp).min(remaining as f32 / ramp).min(1.0);
        out += tone.phase.sin() * BEEP_AMPLITUDE * env;
        tone.phase += tone.phase_inc;
        if tone.phase > 2.0 * std::f32::consts::PI {
            tone.phase -= 2.0 * std::f32::consts::PI;
        }
        tone.samples_emitted += 1;
        if tone.samples_emitted >= tone.total_samples {
            tones.swap_remove(i);
            continue;
        }
        i += 1;
    }
    out.tanh()
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    state: Arc<Mutex<AudioState>>,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
    convert: impl Fn(f32) -> T + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample + Send + 'static,
{
    device.build_output_stream(
        config,
        move |data: &mut [T], _| {
            let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
            for frame in data.chunks_mut(channels.max(1)) {
                let v = convert(mix_sample(&mut guard.tones));
                for s in frame.iter_mut() {
                    *s = v;
                }
            }
        },
        err_fn,
        None,
    )
}
