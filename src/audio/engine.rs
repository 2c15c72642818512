use std::cell::RefCell;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use super::{AudioEngine, AudioError, Volume};

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, AudioError> {
    let file = File::open(path).map_err(|source| AudioError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Decoder::new(BufReader::new(file)).map_err(|source| AudioError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Sound card output through rodio.
///
/// The output stream stops when dropped, so the engine must live as long as
/// the console.
pub struct RodioEngine {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    looped: Option<(PathBuf, Sink)>,
}

impl RodioEngine {
    pub fn try_default() -> Result<Self, AudioError> {
        let (stream, handle) = OutputStream::try_default()?;
        Ok(Self {
            _stream: stream,
            handle,
            looped: None,
        })
    }
}

impl AudioEngine for RodioEngine {
    fn play_loop(&mut self, track: &Path, volume: Volume) -> Result<(), AudioError> {
        if let Some((path, sink)) = &self.looped {
            if path == track && !sink.empty() {
                sink.set_volume(volume.get());
                sink.play();
                return Ok(());
            }
        }

        let source = open_decoder(track)?.repeat_infinite();
        let sink = Sink::try_new(&self.handle)?;
        sink.set_volume(volume.get());
        sink.append(source);
        log::debug!("background track loaded from {}", track.display());
        self.looped = Some((track.to_path_buf(), sink));
        Ok(())
    }

    fn pause_loop(&mut self) {
        if let Some((_, sink)) = &self.looped {
            sink.pause();
        }
    }

    fn set_loop_volume(&mut self, volume: Volume) {
        if let Some((_, sink)) = &self.looped {
            sink.set_volume(volume.get());
        }
    }

    fn play_once(&mut self, sound: &Path, volume: Volume) -> Result<(), AudioError> {
        let source = open_decoder(sound)?;
        let sink = Sink::try_new(&self.handle)?;
        sink.set_volume(volume.get());
        sink.append(source);
        sink.detach();
        Ok(())
    }
}

/// Engine that plays nothing; used with `--mute` or when no device exists
#[derive(Debug, Default)]
pub struct SilentEngine;

impl AudioEngine for SilentEngine {
    fn play_loop(&mut self, track: &Path, _volume: Volume) -> Result<(), AudioError> {
        log::debug!("muted: not playing {}", track.display());
        Ok(())
    }

    fn pause_loop(&mut self) {}

    fn set_loop_volume(&mut self, _volume: Volume) {}

    fn play_once(&mut self, sound: &Path, _volume: Volume) -> Result<(), AudioError> {
        log::debug!("muted: not playing {}", sound.display());
        Ok(())
    }
}

/// One request made to a [`RecordingEngine`]
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    PlayLoop(PathBuf, Volume),
    PauseLoop,
    LoopVolume(Volume),
    PlayOnce(PathBuf, Volume),
}

/// Engine that records what it was asked to do.
///
/// The call log is shared, so a clone kept by a test still sees calls made
/// through the boxed engine inside a console.
#[derive(Debug, Clone, Default)]
pub struct RecordingEngine {
    calls: Rc<RefCell<Vec<AudioCall>>>,
    reject: Rc<RefCell<bool>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent play request fail, like a blocked autoplay.
    pub fn reject_playback(&self, reject: bool) {
        *self.reject.borrow_mut() = reject;
    }

    pub fn calls(&self) -> Vec<AudioCall> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&AudioCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    fn check(&self) -> Result<(), AudioError> {
        if *self.reject.borrow() {
            Err(AudioError::Rejected("playback disabled".to_string()))
        } else {
            Ok(())
        }
    }
}

impl AudioEngine for RecordingEngine {
    fn play_loop(&mut self, track: &Path, volume: Volume) -> Result<(), AudioError> {
        self.calls
            .borrow_mut()
            .push(AudioCall::PlayLoop(track.to_path_buf(), volume));
        self.check()
    }

    fn pause_loop(&mut self) {
        self.calls.borrow_mut().push(AudioCall::PauseLoop);
    }

    fn set_loop_volume(&mut self, volume: Volume) {
        self.calls.borrow_mut().push(AudioCall::LoopVolume(volume));
    }

    fn play_once(&mut self, sound: &Path, volume: Volume) -> Result<(), AudioError> {
        self.calls
            .borrow_mut()
            .push(AudioCall::PlayOnce(sound.to_path_buf(), volume));
        self.check()
    }
}
