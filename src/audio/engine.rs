use crate::catalog::AudioSource;
use crate::error::PlaybackError;

use super::types::LoadTicket;

/// The imperative side of a media engine.
///
/// Implementations own exactly one playback primitive. Nothing here may panic
/// or block on I/O: load and decode failures come back asynchronously as
/// [`super::EngineEvent::Error`] tagged with the load's ticket, and the only
/// synchronous failure is [`MediaEngine::play`] being refused.
pub trait MediaEngine {
    /// Replace the current source. Playback stays paused until `play`.
    fn load(&mut self, ticket: LoadTicket, source: &AudioSource);

    fn play(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self);

    /// Seek to `seconds`, clamped to the loaded source's duration.
    fn set_position(&mut self, seconds: f64);

    /// Set the output level, clamped to `[0, 1]`.
    fn set_volume(&mut self, level: f32);
}

pub fn clamp_volume(level: f32) -> f32 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}

/// Clamp a position to `[0, duration]`; an unknown (zero) duration only
/// bounds it from below.
pub fn clamp_position(seconds: f64, duration: f64) -> f64 {
    if !seconds.is_finite() {
        return if seconds == f64::INFINITY && duration > 0.0 {
            duration
        } else {
            0.0
        };
    }
    let lower = seconds.max(0.0);
    if duration > 0.0 {
        lower.min(duration)
    } else {
        lower
    }
}
