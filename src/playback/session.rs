use crate::catalog::{Track, TrackId};
use crate::error::PlaybackError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl PlayState {
    pub fn label(self) -> &'static str {
        match self {
            PlayState::Stopped => "Stopped",
            PlayState::Playing => "Playing",
            PlayState::Paused => "Paused",
        }
    }
}

/// Snapshot of what the player is doing.
///
/// Only [`super::PlaybackStore`] writes one of these; everything else gets
/// clones. With no current track the session is always `Stopped` at 0.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    pub current_track: Option<Track>,
    pub play_state: PlayState,
    pub position_seconds: f64,
    /// Zero until the engine reports metadata.
    pub duration_seconds: f64,
    pub volume: f32,
    /// A scrub gesture is in progress; engine time updates are ignored.
    pub is_seeking: bool,
    /// Most recent playback failure for the current track, cleared on a new
    /// selection.
    pub last_error: Option<PlaybackError>,
}

impl PlaybackSession {
    pub fn new(volume: f32) -> Self {
        Self {
            current_track: None,
            play_state: PlayState::Stopped,
            position_seconds: 0.0,
            duration_seconds: 0.0,
            volume,
            is_seeking: false,
            last_error: None,
        }
    }

    pub fn current_id(&self) -> Option<&TrackId> {
        self.current_track.as_ref().map(|t| &t.id)
    }

    /// Whether `id` is the selected track, playing or not.
    pub fn is_current(&self, id: &TrackId) -> bool {
        self.current_id() == Some(id)
    }

    /// Whether `id` is the selected track and audibly playing.
    pub fn is_playing_track(&self, id: &TrackId) -> bool {
        self.is_current(id) && self.play_state == PlayState::Playing
    }

    pub fn is_playing(&self) -> bool {
        self.play_state == PlayState::Playing
    }

    pub fn remaining_seconds(&self) -> f64 {
        (self.duration_seconds - self.position_seconds).max(0.0)
    }
}
