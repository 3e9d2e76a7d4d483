//! Media engine adapter.
//!
//! [`MediaEngine`] is the seam the playback store drives; [`AudioPlayer`] is
//! its rodio implementation. Engine observations flow back as
//! [`EngineMessage`]s over an mpsc channel, each tagged with the
//! [`LoadTicket`] of the load that produced it.

mod engine;
mod player;
mod sink;
mod thread;
mod types;

pub use engine::{MediaEngine, clamp_position, clamp_volume};
pub use player::AudioPlayer;
pub use types::{EngineEvent, EngineMessage, LoadTicket};
