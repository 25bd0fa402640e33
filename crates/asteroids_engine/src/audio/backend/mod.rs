//! Audio backend implementations
//!
//! Platform-independent abstraction over audio playback libraries.

mod recording;

pub use recording::RecordingAudio;

use std::path::Path;

use super::{AudioError, SoundId};

/// Audio backend trait for platform abstraction
///
/// Playback is fire-and-forget: the simulation never waits on or queries a
/// playing sound.
pub trait AudioBackend {
    /// Load a sample and return its id
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be decoded or the sample table is full.
    fn load_sound(&mut self, path: &Path) -> Result<SoundId, AudioError>;

    /// Start playing a loaded sample
    fn play_sound(&mut self, sound: SoundId);

    /// Load the background music track, replacing any previous one
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be decoded.
    fn load_music(&mut self, path: &Path) -> Result<(), AudioError>;

    /// Start looping the loaded music track
    fn play_music(&mut self);
}
