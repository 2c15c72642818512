use std::path::{Path, PathBuf};

use super::{AudioEngine, Volume};

/// The looping "speed listening" track played under the lesson
#[derive(Debug, Clone)]
pub struct BackgroundTrack {
    path: PathBuf,
    volume: Volume,
    playing: bool,
}

impl BackgroundTrack {
    pub fn new(path: PathBuf, volume: Volume) -> Self {
        Self {
            path,
            volume,
            playing: false,
        }
    }

    /// Play if paused, pause if playing.
    ///
    /// A rejected play is logged and leaves the track marked as paused.
    pub fn toggle(&mut self, engine: &mut dyn AudioEngine) {
        if self.playing {
            engine.pause_loop();
            self.playing = false;
            return;
        }

        self.playing = true;
        if let Err(e) = engine.play_loop(&self.path, self.volume) {
            log::warn!("background track failed to play: {}", e);
            self.playing = false;
        }
    }

    pub fn set_volume(&mut self, volume: Volume, engine: &mut dyn AudioEngine) {
        self.volume = volume;
        if self.playing {
            engine.set_loop_volume(volume);
        }
    }

    /// Pause without touching the volume; used on teardown.
    pub fn halt(&mut self, engine: &mut dyn AudioEngine) {
        if self.playing {
            engine.pause_loop();
            self.playing = false;
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
