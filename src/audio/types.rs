//! Messages exchanged with the audio thread.

use std::path::PathBuf;

use crate::catalog::TrackId;
use crate::error::PlaybackError;

/// Identifies one `load` request.
///
/// `seq` is bumped for every load, so selecting A, then B, then A again still
/// yields three distinct tickets; `track` is carried along for logging and
/// for the identity check against the current track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub seq: u64,
    pub track: TrackId,
}

impl LoadTicket {
    pub fn new(seq: u64, track: TrackId) -> Self {
        Self { seq, track }
    }
}

/// What the engine observed about the source it is playing.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Current playback position, in seconds.
    TimeUpdate(f64),
    /// Total duration of the loaded source, in seconds.
    MetadataLoaded(f64),
    Ended,
    Error(PlaybackError),
}

/// An [`EngineEvent`] tagged with the load it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineMessage {
    pub ticket: LoadTicket,
    pub event: EngineEvent,
}

#[derive(Debug)]
pub(super) enum AudioCmd {
    /// Replace the current source with the file at `path`, paused at zero.
    Load { ticket: LoadTicket, path: PathBuf },
    Play,
    Pause,
    /// Move to an absolute position in seconds.
    SetPosition(f64),
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}
