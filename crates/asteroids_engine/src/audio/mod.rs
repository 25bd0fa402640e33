//! Audio playback interface
//!
//! The simulation only triggers samples and starts background music; mixing
//! and device output belong to an [`AudioBackend`] implementation.

pub mod backend;

pub use backend::{AudioBackend, RecordingAudio};

use std::path::PathBuf;

/// Maximum loaded samples per backend
pub const MAX_SOUND_SAMPLES: usize = 16;

/// Index of a loaded sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundId(u16);

impl SoundId {
    /// Wrap a raw sample index
    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Raw sample index
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Audio errors
#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    /// The audio device could not be opened
    #[error("audio device unavailable: {0}")]
    Device(String),

    /// A sample or music file could not be loaded
    #[error("failed to load {path}: {reason}")]
    Load {
        /// File that failed
        path: PathBuf,
        /// Backend message
        reason: String,
    },

    /// Every sample slot is taken
    #[error("sample table full ({max} samples)")]
    TooManySamples {
        /// Table size
        max: usize,
    },
}
