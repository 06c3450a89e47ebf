//! Fire-and-forget beep requests.
//!
//! The update loop only produces [`BeepRequest`]s; whatever plays them sits
//! behind [`BeepSink`]. A failing sink never reaches visualization state:
//! [`play_beep`] swallows the error and logs a textual stand-in.

use crate::constants::{BEEP_DURATION, BEEP_FREQUENCY};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeepRequest {
    pub frequency_hz: f32,
    pub duration_sec: f32,
}

impl BeepRequest {
    pub fn new(frequency_hz: f32, duration_sec: f32) -> Self {
        Self {
            frequency_hz,
            duration_sec,
        }
    }

    /// Beep at `frequency_hz` for the default duration.
    pub fn tone(frequency_hz: f32) -> Self {
        Self::new(frequency_hz, BEEP_DURATION)
    }
}

impl Default for BeepRequest {
    fn default() -> Self {
        Self::tone(BEEP_FREQUENCY)
    }
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device")]
    NoDevice,
    #[error("audio backend: {0}")]
    Backend(String),
}

pub trait BeepSink {
    fn beep(&self, req: BeepRequest) -> Result<(), AudioError>;
}

/// Sink for headless runs; every beep takes the fallback path.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentSink;

impl BeepSink for SilentSink {
    fn beep(&self, _req: BeepRequest) -> Result<(), AudioError> {
        Err(AudioError::NoDevice)
    }
}

pub fn play_beep(sink: &dyn BeepSink, req: BeepRequest) {
    if let Err(e) = sink.beep(req) {
        log::debug!("beep unavailable: {e}");
        log::info!("*BEEP* ({:.0}Hz)", req.frequency_hz);
    }
}
