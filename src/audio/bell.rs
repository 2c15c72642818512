use std::path::{Path, PathBuf};

use super::{AudioEngine, Volume};

/// One-shot sound rung when the countdown expires
#[derive(Debug, Clone)]
pub struct Bell {
    path: PathBuf,
    volume: Volume,
}

impl Bell {
    pub fn new(path: PathBuf, volume: Volume) -> Self {
        Self { path, volume }
    }

    /// Each ring is a fresh playback at the volume set right now.
    pub fn ring(&self, engine: &mut dyn AudioEngine) {
        log::info!("timer expired, ringing bell at {}%", self.volume.percent());
        if let Err(e) = engine.play_once(&self.path, self.volume) {
            log::warn!("bell failed to play: {}", e);
        }
    }

    pub fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCall, RecordingEngine};

    #[test]
    fn ring_uses_current_volume() {
        let probe = RecordingEngine::new();
        let mut engine = probe.clone();
        let mut bell = Bell::new(PathBuf::from("audio/alarm.mp3"), Volume::new(0.5));

        bell.ring(&mut engine);
        bell.set_volume(Volume::new(0.2));
        bell.ring(&mut engine);

        assert_eq!(
            probe.calls(),
            vec![
                AudioCall::PlayOnce(PathBuf::from("audio/alarm.mp3"), Volume::new(0.5)),
                AudioCall::PlayOnce(PathBuf::from("audio/alarm.mp3"), Volume::new(0.2)),
            ]
        );
    }

    #[test]
    fn failed_ring_is_swallowed() {
        let probe = RecordingEngine::new();
        let mut engine = probe.clone();
        probe.reject_playback(true);
        let bell = Bell::new(PathBuf::from("audio/alarm.mp3"), Volume::FULL);

        bell.ring(&mut engine);

        assert_eq!(bell.volume(), Volume::FULL);
        assert_eq!(probe.calls().len(), 1);
    }
}
