//! Backend that records playback requests instead of producing sound

use std::path::{Path, PathBuf};

use super::AudioBackend;
use crate::audio::{AudioError, SoundId, MAX_SOUND_SAMPLES};

/// Silent backend for headless runs and tests
///
/// Loading registers the path without touching the filesystem; every play
/// request is appended to a log that callers can inspect.
#[derive(Debug, Default)]
pub struct RecordingAudio {
    samples: Vec<PathBuf>,
    music: Option<PathBuf>,
    music_playing: bool,
    played: Vec<SoundId>,
}

impl RecordingAudio {
    /// Backend with no samples loaded
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every sample played so far, in order
    #[must_use]
    pub fn played(&self) -> &[SoundId] {
        &self.played
    }

    /// Path a sample was loaded from
    #[must_use]
    pub fn sample_path(&self, sound: SoundId) -> Option<&Path> {
        self.samples.get(sound.index()).map(PathBuf::as_path)
    }

    /// Whether music was started
    #[must_use]
    pub const fn music_playing(&self) -> bool {
        self.music_playing
    }
}

impl AudioBackend for RecordingAudio {
    fn load_sound(&mut self, path: &Path) -> Result<SoundId, AudioError> {
        if self.samples.len() >= MAX_SOUND_SAMPLES {
            return Err(AudioError::TooManySamples {
                max: MAX_SOUND_SAMPLES,
            });
        }
        let raw = u16::try_from(self.samples.len()).map_err(|_| AudioError::TooManySamples {
            max: MAX_SOUND_SAMPLES,
        })?;
        self.samples.push(path.to_path_buf());
        log::debug!("Sample {raw} registered from {}", path.display());
        Ok(SoundId::new(raw))
    }

    fn play_sound(&mut self, sound: SoundId) {
        if sound.index() < self.samples.len() {
            self.played.push(sound);
        } else {
            log::warn!("Ignoring play request for unknown sample {sound:?}");
        }
    }

    fn load_music(&mut self, path: &Path) -> Result<(), AudioError> {
        self.music = Some(path.to_path_buf());
        self.music_playing = false;
        Ok(())
    }

    fn play_music(&mut self) {
        self.music_playing = self.music.is_some();
    }
}
