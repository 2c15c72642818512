//! Audio for the console: a looping background track and the timer bell.
//!
//! Playback goes through the [`AudioEngine`] trait. Controllers
//! ([`BackgroundTrack`], [`Bell`]) own the user-facing state and treat every
//! engine failure the same way: log it and carry on.

mod bell;
mod engine;
mod track;

use std::path::PathBuf;

use thiserror::Error;

pub use bell::Bell;
pub use engine::{AudioCall, RecordingEngine, RodioEngine, SilentEngine};
pub use track::BackgroundTrack;

/// Playback volume in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Volume(f32);

impl Volume {
    /// Keyboard adjustment step, matching a 0-100% slider in tenths
    pub const STEP: f32 = 0.1;

    pub const MUTED: Volume = Volume(0.0);
    pub const FULL: Volume = Volume(1.0);

    /// Clamps into `[0, 1]`; NaN becomes silence.
    pub fn new(v: f32) -> Self {
        if v.is_nan() {
            return Self::MUTED;
        }
        Self(v.clamp(0.0, 1.0))
    }

    pub fn get(self) -> f32 {
        self.0
    }

    pub fn percent(self) -> u8 {
        (self.0 * 100.0).round() as u8
    }

    /// One step up, snapped to the nearest tenth so repeated steps don't drift.
    pub fn raised(self) -> Self {
        Self::new(((self.0 + Self::STEP) * 10.0).round() / 10.0)
    }

    pub fn lowered(self) -> Self {
        Self::new(((self.0 - Self::STEP) * 10.0).round() / 10.0)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::FULL
    }
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    Device(#[from] rodio::StreamError),
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: rodio::decoder::DecoderError,
    },
    #[error("playback rejected: {0}")]
    Play(#[from] rodio::PlayError),
    #[error("playback rejected: {0}")]
    Rejected(String),
}

/// Backend that actually produces sound
pub trait AudioEngine {
    /// Start the looping track, or resume it from where it was paused.
    fn play_loop(&mut self, track: &std::path::Path, volume: Volume) -> Result<(), AudioError>;

    fn pause_loop(&mut self);

    /// Applies to the loop immediately if it is loaded.
    fn set_loop_volume(&mut self, volume: Volume);

    /// Fire-and-forget playback of a short sound.
    fn play_once(&mut self, sound: &std::path::Path, volume: Volume) -> Result<(), AudioError>;
}
